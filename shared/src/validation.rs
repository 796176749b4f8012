use validator::ValidationError;

pub fn validate_guess_letter(ch: char) -> Result<char, ValidationError> {
    if !ch.is_ascii_alphabetic() {
        return Err(ValidationError::new("guess_not_alphabetic"));
    }
    Ok(ch.to_ascii_uppercase())
}

pub fn validate_guess(guess: &str, length: usize) -> Result<(), ValidationError> {
    if !guess.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::new("guess_not_alphabetic"));
    }
    if guess.chars().count() != length {
        let mut err = ValidationError::new("guess_length");
        err.add_param("expected".into(), &length);
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_letters() {
        assert_eq!(validate_guess_letter('q').unwrap(), 'Q');
        assert!(validate_guess_letter('1').is_err());
        assert!(validate_guess_letter('é').is_err());
    }

    #[test]
    fn test_guess_shape() {
        assert!(validate_guess("TRUCK", 5).is_ok());
        assert_eq!(validate_guess("TRUC", 5).unwrap_err().code, "guess_length");
        assert_eq!(validate_guess("TR0CK", 5).unwrap_err().code, "guess_not_alphabetic");
    }
}
