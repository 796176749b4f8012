//! Game session engine.
//!
//! [`GameEngine::handle`] applies one [`Event`] at a time and runs it to
//! completion. Anything that needs the network is queued as a [`Command`];
//! the driver executes it and feeds the completion back as another event, so
//! a guess and a state refresh can be outstanding at the same time without
//! either ever observing a half-applied update.

mod navigation;
mod pipeline;
mod reconciler;


use std::time::Duration;

use tracing::debug;
use zeronight_shared::constants::ALREADY_SOLVED_NOTICE;
use zeronight_shared::shared_word_game::{
    GuessRequest, GuessResponse, LevelDescriptor, LevelStateResponse, LevelsResponse, StateResponse,
};
use zeronight_shared::validation::validate_guess_letter;

use crate::catalog::LevelCatalog;
use crate::clock::Clock;
use crate::config::ClientConfig;
use crate::cooldown::CooldownManager;
use crate::error::ApiError;
use crate::game_board::Board;
use crate::keyboard::{Key, KeyboardHints};
use crate::notice::Notices;
use crate::ports::{GameView, LevelTrack};
use crate::scheduler::{Scheduler, Task, Timers};
use crate::session::SessionState;

pub use pipeline::{GuessOutcome, GuessPipeline, Rejection, SubmitPhase};
use reconciler::AfterSync;

const DEFAULT_LENGTH: usize = 5;
const DEFAULT_MAX_ATTEMPTS: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchLevels,
    FetchState { request_id: u64, full: bool },
    FetchLevelState { level: u32 },
    SubmitGuess(GuessRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Start,
    Key(Key),
    Navigate(u32),
    /// "Next" on the win dialog.
    AdvanceToNext,
    Tick {
        task: Task,
        generation: u64,
    },
    LevelsLoaded(Result<LevelsResponse, ApiError>),
    StateLoaded {
        request_id: u64,
        full: bool,
        result: Result<StateResponse, ApiError>,
    },
    LevelStateLoaded {
        level: u32,
        result: Result<LevelStateResponse, ApiError>,
    },
    GuessCompleted {
        request: GuessRequest,
        result: Result<GuessResponse, ApiError>,
    },
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    pub poll_interval: Duration,
    pub guess_cooldown: Duration,
    pub notice_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for EngineSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            poll_interval: config.poll_interval,
            guess_cooldown: config.guess_cooldown,
            notice_timeout: config.notice_timeout,
        }
    }
}

pub struct GameEngine<V, S, C> {
    view: V,
    clock: C,
    timers: Timers<S>,
    settings: EngineSettings,
    catalog: LevelCatalog,
    session: SessionState,
    board: Board,
    hints: KeyboardHints,
    cooldown: CooldownManager,
    notices: Notices,
    pipeline: GuessPipeline,
    commands: Vec<Command>,
    next_request_id: u64,
    last_applied_state: u64,
    after_sync: Vec<(u64, AfterSync)>,
    // Level whose history has been requested but not applied yet
    history_pending: Option<u32>,
    awaiting_catalog: bool,
    loaded: bool,
}

impl<V, S, C> GameEngine<V, S, C>
where
    V: GameView,
    S: Scheduler,
    C: Clock,
{
    pub fn new(view: V, scheduler: S, clock: C, settings: EngineSettings) -> Self {
        Self {
            view,
            clock,
            timers: Timers::new(scheduler),
            settings,
            catalog: LevelCatalog::default(),
            session: SessionState::default(),
            board: Board::new(DEFAULT_LENGTH, DEFAULT_MAX_ATTEMPTS),
            hints: KeyboardHints::default(),
            cooldown: CooldownManager::default(),
            notices: Notices::new(settings.notice_timeout),
            pipeline: GuessPipeline::default(),
            commands: Vec::new(),
            next_request_id: 0,
            last_applied_state: 0,
            after_sync: Vec::new(),
            history_pending: None,
            awaiting_catalog: false,
            loaded: false,
        }
    }

    /// Applies one event. Returns `false` once the engine has shut down.
    pub fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::Start => self.start(),
            Event::Key(key) => self.on_key(key),
            Event::Navigate(level) => {
                if self.loaded {
                    self.goto_level(level);
                }
            }
            Event::AdvanceToNext => {
                if self.loaded {
                    self.advance_to_next();
                }
            }
            Event::Tick { task, generation } => self.on_tick(task, generation),
            Event::LevelsLoaded(result) => self.on_levels_loaded(result),
            Event::StateLoaded {
                request_id,
                full,
                result,
            } => self.on_state_loaded(request_id, full, result),
            Event::LevelStateLoaded { level, result } => self.on_level_state_loaded(level, result),
            Event::GuessCompleted { request, result } => self.on_guess_completed(request, result),
            Event::Shutdown => {
                self.shutdown();
                return false;
            }
        }
        true
    }

    /// Drains the commands queued by the events handled so far.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hints(&self) -> &KeyboardHints {
        &self.hints
    }

    pub fn cooldown(&self) -> &CooldownManager {
        &self.cooldown
    }

    pub fn submit_phase(&self) -> &SubmitPhase {
        self.pipeline.phase()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn start(&mut self) {
        if self.loaded {
            return;
        }
        self.request_state(true, None);
    }

    fn shutdown(&mut self) {
        for task in [Task::CooldownTick, Task::StatePoll, Task::NoticeHide] {
            self.timers.cancel(task);
        }
    }

    fn on_key(&mut self, key: Key) {
        if !self.loaded || self.session.input_locked() {
            return;
        }
        match key {
            Key::Enter => self.submit_guess(),
            Key::Backspace => {
                self.backspace();
            }
            Key::Letter(ch) => {
                self.append_letter(ch);
            }
        }
    }

    /// Adds a letter to the pending guess. Returns whether the buffer changed.
    pub fn append_letter(&mut self, ch: char) -> bool {
        if self.session.input_locked() {
            return false;
        }
        let Ok(letter) = validate_guess_letter(ch) else {
            return false;
        };
        if self.session.is_solved(self.session.current_level()) {
            self.post_notice(ALREADY_SOLVED_NOTICE, true);
            return false;
        }

        let length = self.current_descriptor().length;
        if !self.session.buffer_mut().push(letter, length) {
            return false;
        }
        self.paint_pending();
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.session.input_locked() || self.session.buffer_mut().pop().is_none() {
            return false;
        }
        self.paint_pending();
        true
    }

    fn on_tick(&mut self, task: Task, generation: u64) {
        if !self.timers.accept(task, generation) {
            debug!(?task, generation, "dropping stale tick");
            return;
        }
        match task {
            Task::CooldownTick => {
                let text = self.cooldown.tick(self.clock.now(), &mut self.timers);
                self.view.render_cooldown(&text);
            }
            Task::StatePoll => self.refresh_state(),
            Task::NoticeHide => self.notices.on_hide(&mut self.view),
        }
    }

    fn current_descriptor(&self) -> LevelDescriptor {
        let level = self.session.current_level();
        self.catalog
            .descriptor_of(level)
            .cloned()
            .unwrap_or(LevelDescriptor {
                level,
                length: DEFAULT_LENGTH,
                max_attempts: DEFAULT_MAX_ATTEMPTS,
            })
    }

    fn start_cooldown(&mut self, duration: Duration) {
        let text = self.cooldown.extend(duration, self.clock.now(), &mut self.timers);
        self.view.render_cooldown(&text);
    }

    /// Unlocks input unless a history load or a guess in flight still owns it.
    fn reopen_input(&mut self) {
        if self.history_pending.is_none() && self.pipeline.in_flight().is_none() {
            self.session.unlock_input();
        }
    }

    fn post_notice(&mut self, message: &str, auto_hide: bool) {
        self.notices.post(message, auto_hide, &mut self.timers, &mut self.view);
    }

    fn paint_pending(&mut self) {
        let row = self.session.current_row();
        self.board.paint_pending(row, self.session.buffer().as_str());
        self.view.render_board(&self.board);
    }

    fn render_tracks(&mut self) {
        let track = LevelTrack::build(&self.catalog, self.session.solved_levels(), self.session.current_level());
        self.view.render_level_track(&track);

        let total = match self.session.bot_total() {
            0 => self.catalog.len() as u32,
            total => total,
        };
        self.view.render_bot_track(self.session.bot_solved(), total);
    }
}
