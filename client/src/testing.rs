//! Deterministic stand-ins for the clock, the scheduler and the view.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::clock::Clock;
use crate::game_board::Board;
use crate::keyboard::KeyboardHints;
use crate::ports::{LevelTrack, NoticeOptions, NoticePort, RenderPort, ResultDialog};
use crate::scheduler::{Schedule, Scheduler, Task};

#[derive(Clone)]
pub struct ManualClock {
    start: Instant,
    offset: Rc<Cell<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.offset.get()
    }
}

/// Records what is scheduled; tests fire ticks by hand.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    tasks: Rc<RefCell<HashMap<Task, (Schedule, u64)>>>,
}

impl ManualScheduler {
    pub fn generation(&self, task: Task) -> Option<u64> {
        self.tasks.borrow().get(&task).map(|(_, generation)| *generation)
    }

    pub fn schedule(&self, task: Task) -> Option<Schedule> {
        self.tasks.borrow().get(&task).map(|(schedule, _)| *schedule)
    }

    pub fn is_running(&self, task: Task) -> bool {
        self.tasks.borrow().contains_key(&task)
    }
}

impl Scheduler for ManualScheduler {
    fn restart(&mut self, task: Task, schedule: Schedule, generation: u64) {
        self.tasks.borrow_mut().insert(task, (schedule, generation));
    }

    fn cancel(&mut self, task: Task) {
        self.tasks.borrow_mut().remove(&task);
    }
}

#[derive(Default)]
pub struct RecordingView {
    pub board: Option<Board>,
    pub hints: Option<KeyboardHints>,
    pub track: Option<LevelTrack>,
    pub bot_track: Option<(u32, u32)>,
    pub cooldown_texts: Vec<String>,
    pub notices: Vec<(String, NoticeOptions)>,
    pub cleared: usize,
    pub dialogs: Vec<ResultDialog>,
}

impl RecordingView {
    pub fn notices_with(&self, text: &str) -> usize {
        self.notices.iter().filter(|(message, _)| message == text).count()
    }

    pub fn last_notice(&self) -> Option<&str> {
        self.notices.last().map(|(message, _)| message.as_str())
    }
}

impl RenderPort for RecordingView {
    fn render_board(&mut self, board: &Board) {
        self.board = Some(board.clone());
    }

    fn render_keyboard_hints(&mut self, hints: &KeyboardHints) {
        self.hints = Some(hints.clone());
    }

    fn render_level_track(&mut self, track: &LevelTrack) {
        self.track = Some(track.clone());
    }

    fn render_bot_track(&mut self, solved: u32, total: u32) {
        self.bot_track = Some((solved, total));
    }

    fn render_cooldown(&mut self, text: &str) {
        self.cooldown_texts.push(text.to_string());
    }
}

impl NoticePort for RecordingView {
    fn notify(&mut self, message: &str, options: NoticeOptions) {
        self.notices.push((message.to_string(), options));
    }

    fn clear_notice(&mut self) {
        self.cleared += 1;
    }

    fn show_result_dialog(&mut self, dialog: &ResultDialog) {
        self.dialogs.push(dialog.clone());
    }
}
