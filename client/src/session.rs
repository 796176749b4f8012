use std::collections::BTreeSet;

use zeronight_shared::shared_word_game::BotProgress;

use crate::catalog::LevelCatalog;
use crate::game_board::GuessBuffer;

/// Mutable game session. Only the engine owns one; every change goes through
/// the methods below.
#[derive(Debug, Clone)]
pub struct SessionState {
    current_level: u32,
    buffer: GuessBuffer,
    current_row: usize,
    input_locked: bool,
    solved_levels: BTreeSet<u32>,
    bot_solved: u32,
    bot_total: u32,
    bot_finished: bool,
    // Set once the AI-finished loss has been announced for the current lockout
    ai_loss_announced: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current_level: 1,
            buffer: GuessBuffer::default(),
            current_row: 0,
            input_locked: false,
            solved_levels: BTreeSet::new(),
            bot_solved: 0,
            bot_total: 0,
            bot_finished: false,
            ai_loss_announced: false,
        }
    }
}

impl SessionState {
    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn buffer(&self) -> &GuessBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut GuessBuffer {
        &mut self.buffer
    }

    pub fn current_row(&self) -> usize {
        self.current_row
    }

    pub fn set_row(&mut self, row: usize) {
        self.current_row = row;
    }

    pub fn advance_row(&mut self) -> usize {
        self.current_row += 1;
        self.current_row
    }

    pub fn input_locked(&self) -> bool {
        self.input_locked
    }

    pub fn lock_input(&mut self) {
        self.input_locked = true;
    }

    pub fn unlock_input(&mut self) {
        self.input_locked = false;
    }

    pub fn solved_levels(&self) -> &BTreeSet<u32> {
        &self.solved_levels
    }

    pub fn is_solved(&self, level: u32) -> bool {
        self.solved_levels.contains(&level)
    }

    pub fn mark_solved(&mut self, level: u32) {
        self.solved_levels.insert(level);
    }

    /// Server snapshot wins outright; nothing local is merged in.
    pub fn replace_solved(&mut self, solved: impl IntoIterator<Item = u32>) {
        self.solved_levels = solved.into_iter().collect();
    }

    pub fn replace_bot(&mut self, bot: &BotProgress) {
        self.bot_solved = bot.solved;
        self.bot_total = bot.total;
        self.bot_finished = bot.finished;
    }

    pub fn bot_solved(&self) -> u32 {
        self.bot_solved
    }

    pub fn bot_total(&self) -> u32 {
        self.bot_total
    }

    pub fn bot_finished(&self) -> bool {
        self.bot_finished
    }

    pub fn mark_bot_finished(&mut self) {
        self.bot_finished = true;
    }

    pub fn player_finished(&self, catalog: &LevelCatalog) -> bool {
        catalog.all_solved(&self.solved_levels)
    }

    /// The bot is done and the player is not: a terminal loss for this session.
    pub fn locked_out(&self, catalog: &LevelCatalog) -> bool {
        self.bot_finished && !self.player_finished(catalog)
    }

    pub fn ai_loss_announced(&self) -> bool {
        self.ai_loss_announced
    }

    pub fn set_ai_loss_announced(&mut self, announced: bool) {
        self.ai_loss_announced = announced;
    }

    /// Makes `level` active with an empty buffer, first row and unlocked input.
    pub fn enter_level(&mut self, level: u32) {
        self.current_level = level;
        self.buffer.clear();
        self.current_row = 0;
        self.input_locked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeronight_shared::shared_word_game::LevelDescriptor;

    #[test]
    fn test_locked_out_requires_unfinished_player() {
        let catalog = LevelCatalog::new(vec![
            LevelDescriptor { level: 1, length: 5, max_attempts: 6 },
            LevelDescriptor { level: 2, length: 5, max_attempts: 6 },
        ]);
        let mut session = SessionState::default();
        session.replace_bot(&BotProgress { solved: 2, total: 2, seconds_left: None, finished: true });
        assert!(session.locked_out(&catalog));

        session.replace_solved([1, 2]);
        assert!(!session.locked_out(&catalog));
    }

    #[test]
    fn test_enter_level_resets_progress() {
        let mut session = SessionState::default();
        session.buffer_mut().push('A', 5);
        session.advance_row();
        session.lock_input();

        session.enter_level(3);

        assert_eq!(session.current_level(), 3);
        assert!(session.buffer().is_empty());
        assert_eq!(session.current_row(), 0);
        assert!(!session.input_locked());
    }
}
