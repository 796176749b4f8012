use zeronight_shared::shared_word_game::{LetterStatus, LevelDescriptor};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tile {
    pub letter: Option<char>,
    pub status: Option<LetterStatus>,
}

/// Tile grid for one level: `max_attempts` rows of `length` tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    length: usize,
    rows: Vec<Vec<Tile>>,
}

impl Board {
    pub fn new(length: usize, max_attempts: usize) -> Self {
        Self {
            length,
            rows: vec![vec![Tile::default(); length]; max_attempts],
        }
    }

    pub fn for_level(descriptor: &LevelDescriptor) -> Self {
        Self::new(descriptor.length, descriptor.max_attempts)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }

    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(Tile::default());
        }
    }

    /// Paints a scored attempt. Letters without a matching status stay unscored.
    pub fn set_attempt(&mut self, row: usize, guess: &str, result: &[LetterStatus]) {
        let Some(tiles) = self.rows.get_mut(row) else {
            return;
        };
        for (col, (tile, letter)) in tiles.iter_mut().zip(guess.chars()).enumerate() {
            tile.letter = Some(letter.to_ascii_uppercase());
            tile.status = result.get(col).copied();
        }
    }

    /// Shows the in-progress guess on `row`, blanking the rest of it.
    pub fn paint_pending(&mut self, row: usize, pending: &str) {
        let Some(tiles) = self.rows.get_mut(row) else {
            return;
        };
        let mut letters = pending.chars();
        for tile in tiles.iter_mut() {
            *tile = Tile {
                letter: letters.next(),
                status: None,
            };
        }
    }
}

/// In-progress guess text for the active level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuessBuffer {
    text: String,
}

impl GuessBuffer {
    /// Appends `ch` unless the buffer already holds `max_len` letters.
    pub fn push(&mut self, ch: char, max_len: usize) -> bool {
        if self.len() >= max_len {
            return false;
        }
        self.text.push(ch);
        true
    }

    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LetterStatus::*;

    #[test]
    fn test_buffer_respects_length() {
        let mut buffer = GuessBuffer::default();
        for ch in "ABCDE".chars() {
            assert!(buffer.push(ch, 5));
        }
        assert!(!buffer.push('F', 5));
        assert_eq!(buffer.as_str(), "ABCDE");
        assert_eq!(buffer.pop(), Some('E'));
        buffer.clear();
        assert_eq!(buffer.pop(), None);
    }

    #[test]
    fn test_attempt_and_pending_rows() {
        let mut board = Board::new(5, 6);
        board.set_attempt(0, "truck", &[Correct, Absent, Present, Absent, Absent]);
        board.paint_pending(1, "PL");

        assert_eq!(board.rows()[0][0], Tile { letter: Some('T'), status: Some(Correct) });
        assert_eq!(board.rows()[1][1], Tile { letter: Some('L'), status: None });
        assert_eq!(board.rows()[1][2], Tile::default());

        board.clear();
        assert!(board.rows().iter().flatten().all(|t| *t == Tile::default()));
    }

    #[test]
    fn test_out_of_range_row_is_ignored() {
        let mut board = Board::new(5, 1);
        board.set_attempt(3, "TRUCK", &[Correct; 5]);
        board.paint_pending(3, "A");
        assert_eq!(board, Board::new(5, 1));
    }
}
