//! Periodic and one-shot tasks the engine relies on.
//!
//! Every start goes through [`Timers::restart`], which replaces a running
//! instance of the same task and hands out a fresh generation. Ticks carry the
//! generation they were scheduled with; [`Timers::accept`] rejects anything
//! older, so a tick that was already queued when its task got restarted or
//! cancelled never reaches the engine.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::engine::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    CooldownTick,
    StatePoll,
    NoticeHide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Once(Duration),
    Every(Duration),
}

/// Timer backend. Implementations deliver `Event::Tick { task, generation }`.
pub trait Scheduler {
    /// Starts `task`, cancelling any instance that is still running.
    fn restart(&mut self, task: Task, schedule: Schedule, generation: u64);
    fn cancel(&mut self, task: Task);
}

pub struct Timers<S> {
    scheduler: S,
    next_generation: u64,
    active: HashMap<Task, (u64, Schedule)>,
}

impl<S: Scheduler> Timers<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            next_generation: 0,
            active: HashMap::new(),
        }
    }

    pub fn restart(&mut self, task: Task, schedule: Schedule) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.active.insert(task, (generation, schedule));
        self.scheduler.restart(task, schedule, generation);
        generation
    }

    pub fn cancel(&mut self, task: Task) {
        if self.active.remove(&task).is_some() {
            self.scheduler.cancel(task);
        }
    }

    pub fn is_running(&self, task: Task) -> bool {
        self.active.contains_key(&task)
    }

    /// Whether a tick is from the live instance of `task`. One-shot tasks are
    /// finished once their tick is accepted.
    pub fn accept(&mut self, task: Task, generation: u64) -> bool {
        match self.active.get(&task) {
            Some(&(current, schedule)) if current == generation => {
                if let Schedule::Once(_) = schedule {
                    self.active.remove(&task);
                }
                true
            }
            _ => false,
        }
    }
}

/// Runs tasks on the tokio runtime and posts ticks onto the engine's event channel.
pub struct TokioScheduler {
    events: UnboundedSender<Event>,
    handles: HashMap<Task, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new(events: UnboundedSender<Event>) -> Self {
        Self {
            events,
            handles: HashMap::new(),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn restart(&mut self, task: Task, schedule: Schedule, generation: u64) {
        self.cancel(task);

        let events = self.events.clone();
        let handle = tokio::spawn(async move {
            match schedule {
                Schedule::Once(delay) => {
                    time::sleep(delay).await;
                    let _ = events.send(Event::Tick { task, generation });
                }
                Schedule::Every(period) => {
                    let mut interval = time::interval_at(Instant::now() + period, period);
                    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    loop {
                        interval.tick().await;
                        if events.send(Event::Tick { task, generation }).is_err() {
                            break;
                        }
                    }
                }
            }
        });
        self.handles.insert(task, handle);
    }

    fn cancel(&mut self, task: Task) {
        if let Some(handle) = self.handles.remove(&task) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}
