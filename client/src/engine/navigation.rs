use reqwest::StatusCode;
use tracing::{debug, info};
use zeronight_shared::constants::{
    AI_FINISHED_NOTICE, DETAIL_LOCKED_LEVEL, LOCKED_NAVIGATION_NOTICE, NO_ATTEMPTS_NOTICE,
};
use zeronight_shared::shared_word_game::LevelStateResponse;

use super::reconciler::AfterSync;
use super::{Command, GameEngine};
use crate::clock::Clock;
use crate::error::ApiError;
use crate::game_board::Board;
use crate::ports::GameView;
use crate::scheduler::Scheduler;

impl<V, S, C> GameEngine<V, S, C>
where
    V: GameView,
    S: Scheduler,
    C: Clock,
{
    /// Solved levels and the unlock pointer are reachable; nothing past it is.
    pub fn can_navigate_to(&self, level: u32) -> bool {
        self.session.is_solved(level) || level == self.catalog.next_unlocked(self.session.solved_levels())
    }

    pub fn goto_level(&mut self, level: u32) {
        if self.pipeline.in_flight().is_some() {
            debug!(level, "navigation ignored while a guess is in flight");
            return;
        }
        if !self.can_navigate_to(level) {
            self.post_notice(LOCKED_NAVIGATION_NOTICE, true);
            return;
        }
        if self.session.locked_out(&self.catalog) {
            self.session.lock_input();
            self.session.set_ai_loss_announced(true);
            self.post_notice(AI_FINISHED_NOTICE, false);
            return;
        }

        self.enter_level(level);
        self.post_notice("", true);
    }

    pub fn advance_to_next(&mut self) {
        let next = self.catalog.next_unlocked(self.session.solved_levels());
        self.goto_level(next);
    }

    /// Switches to `level` with a fresh board and hints and asks for its history.
    pub(super) fn enter_level(&mut self, level: u32) {
        info!(level, "entering level");
        self.session.enter_level(level);
        self.hints.reset();
        self.board = Board::for_level(&self.current_descriptor());

        self.view.render_board(&self.board);
        self.view.render_keyboard_hints(&self.hints);
        self.render_tracks();
        self.load_history(level);
    }

    /// Input stays locked until the history lands so a fresh guess cannot race
    /// the replay for the same rows.
    pub(super) fn load_history(&mut self, level: u32) {
        self.session.lock_input();
        self.history_pending = Some(level);
        self.commands.push(Command::FetchLevelState { level });
    }

    pub(super) fn on_level_state_loaded(&mut self, level: u32, result: Result<LevelStateResponse, ApiError>) {
        if self.history_pending != Some(level) || self.session.current_level() != level {
            debug!(level, "dropping history for a level that is no longer active");
            return;
        }

        match result {
            Ok(history) => self.apply_level_state(&history),
            Err(err) if err.is(StatusCode::FORBIDDEN, DETAIL_LOCKED_LEVEL) => {
                info!(level, "level is locked on the server, resyncing");
                self.request_state(false, Some(AfterSync::RepointFrom(level)));
            }
            Err(err) => {
                debug!(level, %err, "level history unavailable");
                self.history_pending = None;
                self.reopen_input();
                self.enforce_bot_lock();
            }
        }
    }

    /// Rebuilds board, hints and row from the server's attempts. Replaying the
    /// same history twice leaves the same state as replaying it once.
    pub(super) fn apply_level_state(&mut self, history: &LevelStateResponse) {
        self.history_pending = None;
        let descriptor = self.current_descriptor();

        self.hints.reset();
        self.board.clear();

        let mut solved = false;
        for (row, attempt) in history.attempts.iter().enumerate() {
            if row < descriptor.max_attempts {
                let guess = attempt.guess.to_ascii_uppercase();
                self.board.set_attempt(row, &guess, &attempt.result);
                for (letter, status) in guess.chars().zip(attempt.result.iter()).take(descriptor.length) {
                    self.hints.merge(letter, *status);
                }
            }
            solved |= attempt.is_correct;
        }

        let used = history.attempts.len();
        self.session.buffer_mut().clear();
        self.session.set_row(used.min(descriptor.max_attempts));
        self.reopen_input();

        if solved {
            self.session.lock_input();
        } else if used >= descriptor.max_attempts {
            self.session.lock_input();
            self.post_notice(NO_ATTEMPTS_NOTICE, true);
        }

        self.view.render_board(&self.board);
        self.view.render_keyboard_hints(&self.hints);
        self.enforce_bot_lock();
    }
}
