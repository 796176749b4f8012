use std::collections::BTreeMap;

use zeronight_shared::shared_word_game::LetterStatus;
use zeronight_shared::validation::validate_guess_letter;

pub const KEYBOARD_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Letter(char),
    Enter,
    Backspace,
}

impl Key {
    /// Decodes on-screen key labels: `ENTER`, `BACK`/`DELETE` or a single letter.
    pub fn from_label(label: &str) -> Option<Key> {
        match label.trim().to_ascii_uppercase().as_str() {
            "ENTER" => Some(Key::Enter),
            "BACK" | "DELETE" => Some(Key::Backspace),
            other => single_letter(other),
        }
    }

    /// Decodes physical key codes such as `Enter`, `Backspace` and `KeyA`.
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "Enter" => Some(Key::Enter),
            "Backspace" => Some(Key::Backspace),
            _ => code.strip_prefix("Key").and_then(single_letter),
        }
    }
}

fn single_letter(text: &str) -> Option<Key> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => validate_guess_letter(ch).ok().map(Key::Letter),
        _ => None,
    }
}

/// Strongest feedback seen per letter within the current level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyboardHints {
    hints: BTreeMap<char, LetterStatus>,
}

impl KeyboardHints {
    /// Stores `status` unless the letter already has an equal or stronger hint.
    /// Returns whether the stored hint changed.
    pub fn merge(&mut self, letter: char, status: LetterStatus) -> bool {
        let letter = letter.to_ascii_uppercase();
        match self.hints.get(&letter) {
            Some(prev) if prev.rank() >= status.rank() => false,
            _ => {
                self.hints.insert(letter, status);
                true
            }
        }
    }

    pub fn get(&self, letter: char) -> Option<LetterStatus> {
        self.hints.get(&letter.to_ascii_uppercase()).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, LetterStatus)> + '_ {
        self.hints.iter().map(|(&letter, &status)| (letter, status))
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    pub fn reset(&mut self) {
        self.hints.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LetterStatus::*;

    #[test]
    fn test_merge_never_downgrades() {
        let mut hints = KeyboardHints::default();
        assert!(hints.merge('e', Present));
        assert!(!hints.merge('E', Absent));
        assert_eq!(hints.get('e'), Some(Present));
        assert!(hints.merge('e', Correct));
        assert!(!hints.merge('e', Present));
        assert_eq!(hints.get('E'), Some(Correct));
    }

    #[test]
    fn test_rank_is_monotonic_over_any_sequence() {
        let sequence = [Absent, Correct, Present, Absent, Present, Correct, Absent];
        let mut hints = KeyboardHints::default();
        let mut best = 0;
        for status in sequence {
            hints.merge('A', status);
            let rank = hints.get('A').map(LetterStatus::rank).unwrap_or(0);
            assert!(rank >= best);
            best = rank;
        }
        assert_eq!(hints.get('A'), Some(Correct));
    }

    #[test]
    fn test_reset_clears() {
        let mut hints = KeyboardHints::default();
        hints.merge('Q', Absent);
        hints.reset();
        assert!(hints.is_empty());
    }

    #[test]
    fn test_key_decoding() {
        assert_eq!(Key::from_label("enter"), Some(Key::Enter));
        assert_eq!(Key::from_label("DELETE"), Some(Key::Backspace));
        assert_eq!(Key::from_label("q"), Some(Key::Letter('Q')));
        assert_eq!(Key::from_label("QQ"), None);
        assert_eq!(Key::from_code("KeyZ"), Some(Key::Letter('Z')));
        assert_eq!(Key::from_code("Backspace"), Some(Key::Backspace));
        assert_eq!(Key::from_code("Digit1"), None);
        assert_eq!(Key::from_code("Key1"), None);
    }
}
