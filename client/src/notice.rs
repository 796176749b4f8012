use std::time::Duration;

use crate::ports::{NoticeOptions, NoticePort};
use crate::scheduler::{Schedule, Scheduler, Task, Timers};

/// Tracks the visible notice and its auto-hide timer.
///
/// Each auto-hiding notice arms [`Task::NoticeHide`] with a new generation.
/// A hide tick from a notice that has since been replaced fails
/// [`Timers::accept`] and never reaches [`Notices::on_hide`].
#[derive(Debug)]
pub struct Notices {
    last_text: String,
    hide_armed: bool,
    default_timeout: Duration,
}

impl Notices {
    pub fn new(default_timeout: Duration) -> Self {
        Self {
            last_text: String::new(),
            hide_armed: false,
            default_timeout,
        }
    }

    pub fn current(&self) -> &str {
        &self.last_text
    }

    pub fn post<S, V>(&mut self, message: &str, auto_hide: bool, timers: &mut Timers<S>, view: &mut V)
    where
        S: Scheduler,
        V: NoticePort + ?Sized,
    {
        if message == self.last_text && auto_hide && self.hide_armed {
            return;
        }

        self.last_text = message.to_string();
        if self.hide_armed {
            timers.cancel(Task::NoticeHide);
            self.hide_armed = false;
        }

        if message.trim().is_empty() {
            view.clear_notice();
            return;
        }

        let options = NoticeOptions {
            auto_hide,
            timeout: self.default_timeout,
        };
        view.notify(message, options);

        if auto_hide {
            timers.restart(Task::NoticeHide, Schedule::Once(self.default_timeout));
            self.hide_armed = true;
        }
    }

    /// Called for an accepted `NoticeHide` tick.
    pub fn on_hide<V: NoticePort + ?Sized>(&mut self, view: &mut V) {
        self.hide_armed = false;
        self.last_text.clear();
        view.clear_notice();
    }
}
