use tracing::{debug, info};
use zeronight_shared::constants::{AI_FINISHED_NOTICE, ALREADY_SOLVED_NOTICE, LOAD_FAILED_NOTICE};
use zeronight_shared::shared_word_game::{LevelsResponse, StateResponse};

use super::{Command, GameEngine};
use crate::clock::Clock;
use crate::error::ApiError;
use crate::game_board::Board;
use crate::ports::GameView;
use crate::scheduler::{Schedule, Scheduler, Task};

/// Follow-up that runs once a specific state refresh has come back,
/// successful or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AfterSync {
    /// Level history was refused as locked: move to the real unlock pointer.
    RepointFrom(u32),
    /// A guess was refused as locked: move to the unlock pointer and reopen input.
    RepointToUnlock,
    AlreadySolved,
}

impl<V, S, C> GameEngine<V, S, C>
where
    V: GameView,
    S: Scheduler,
    C: Clock,
{
    /// Queues a non-full state fetch. The periodic poll lands here too.
    pub fn refresh_state(&mut self) {
        self.request_state(false, None);
    }

    pub(super) fn request_state(&mut self, full: bool, after: Option<AfterSync>) -> u64 {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        if let Some(after) = after {
            self.after_sync.push((request_id, after));
        }
        self.commands.push(Command::FetchState { request_id, full });
        request_id
    }

    pub(super) fn on_state_loaded(&mut self, request_id: u64, full: bool, result: Result<StateResponse, ApiError>) {
        match result {
            Ok(_) if request_id < self.last_applied_state => {
                debug!(request_id, latest = self.last_applied_state, "ignoring older state snapshot");
            }
            Ok(state) => {
                self.last_applied_state = request_id;
                if self.loaded {
                    self.merge_state(state);
                } else if full {
                    self.initialize(state);
                }
            }
            Err(err) => {
                if full && !self.loaded {
                    debug!(%err, "initial state load failed");
                    self.post_notice(LOAD_FAILED_NOTICE, true);
                } else {
                    // The next poll retries
                    debug!(%err, "state refresh failed");
                }
            }
        }
        self.run_after_sync(request_id);
    }

    pub(super) fn on_levels_loaded(&mut self, result: Result<LevelsResponse, ApiError>) {
        match result {
            Ok(levels) => {
                self.catalog.replace(levels.levels);
                if self.awaiting_catalog {
                    self.awaiting_catalog = false;
                    self.finish_initialization();
                } else if self.loaded {
                    self.render_tracks();
                }
            }
            Err(err) => {
                debug!(%err, "level catalog load failed");
                if self.awaiting_catalog {
                    self.awaiting_catalog = false;
                    self.post_notice(LOAD_FAILED_NOTICE, true);
                }
            }
        }
    }

    fn initialize(&mut self, state: StateResponse) {
        self.apply_snapshot(&state);
        if state.levels.is_none() {
            self.awaiting_catalog = true;
            self.commands.push(Command::FetchLevels);
            return;
        }
        self.finish_initialization();
    }

    fn finish_initialization(&mut self) {
        self.loaded = true;
        let level = self.catalog.next_unlocked(self.session.solved_levels());
        info!(level, levels = self.catalog.len(), "game state loaded");

        self.enter_level(level);
        self.timers
            .restart(Task::StatePoll, Schedule::Every(self.settings.poll_interval));
        self.post_notice("", true);
        self.enforce_bot_lock();
    }

    /// Replaces the solved set and bot progress wholesale; the catalog only when sent.
    /// Returns whether the catalog changed.
    fn apply_snapshot(&mut self, state: &StateResponse) -> bool {
        let catalog_changed = state
            .levels
            .as_ref()
            .map_or(false, |levels| self.catalog.replace(levels.clone()));
        self.session
            .replace_solved(state.player.solved_levels.iter().copied());
        self.session.replace_bot(&state.bot);
        catalog_changed
    }

    /// Board rows of the active level are left alone: they only change when a
    /// guess resolves or the level history is reloaded.
    fn merge_state(&mut self, state: StateResponse) {
        if self.apply_snapshot(&state) {
            info!(levels = self.catalog.len(), "level catalog changed");
            let descriptor = self.current_descriptor();
            let resized = self.board.length() != descriptor.length
                || self.board.rows().len() != descriptor.max_attempts;
            if resized && self.pipeline.in_flight().is_none() {
                self.board = Board::for_level(&descriptor);
                self.view.render_board(&self.board);
                self.load_history(descriptor.level);
            }
        }
        self.render_tracks();
        self.enforce_bot_lock();
    }

    /// Locks input while the bot has finished and the player has not. The loss
    /// notice fires on entering that condition, not on every re-check.
    pub(super) fn enforce_bot_lock(&mut self) {
        if !self.session.locked_out(&self.catalog) {
            self.session.set_ai_loss_announced(false);
            return;
        }

        self.session.lock_input();
        if !self.session.ai_loss_announced() {
            info!(bot_solved = self.session.bot_solved(), "bot finished first");
            self.session.set_ai_loss_announced(true);
            self.post_notice(AI_FINISHED_NOTICE, false);
        }
    }

    fn run_after_sync(&mut self, request_id: u64) {
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.after_sync)
            .into_iter()
            .partition(|(id, _)| *id == request_id);
        self.after_sync = pending;
        if due.is_empty() {
            return;
        }

        for (_, action) in due {
            let next = self.catalog.next_unlocked(self.session.solved_levels());
            let current = self.session.current_level();
            match action {
                AfterSync::RepointFrom(level) => {
                    if current != level {
                        continue;
                    }
                    if next != level {
                        self.enter_level(next);
                    } else {
                        self.history_pending = None;
                        self.reopen_input();
                    }
                }
                AfterSync::RepointToUnlock => {
                    if next != current {
                        self.enter_level(next);
                    } else {
                        self.reopen_input();
                    }
                }
                AfterSync::AlreadySolved => {
                    self.post_notice(ALREADY_SOLVED_NOTICE, true);
                    self.reopen_input();
                }
            }
        }

        self.render_tracks();
        self.enforce_bot_lock();
    }
}
