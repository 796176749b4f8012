use std::time::{Duration, Instant};

use zeronight_shared::rate_limit::{format_cooldown, COOLDOWN_TICK, MAX_RETRY_AFTER};

use crate::scheduler::{Schedule, Scheduler, Task, Timers};

/// Single guess cooldown deadline shared by every code path that starts a wait.
#[derive(Debug, Default)]
pub struct CooldownManager {
    until: Option<Instant>,
}

impl CooldownManager {
    pub fn until(&self) -> Option<Instant> {
        self.until
    }

    /// Pushes the deadline to `now + duration` unless it is already later, then
    /// (re)starts the countdown tick. Waits longer than [`MAX_RETRY_AFTER`] are
    /// capped. Returns the countdown text to show.
    pub fn extend<S: Scheduler>(&mut self, duration: Duration, now: Instant, timers: &mut Timers<S>) -> String {
        let proposed = now.checked_add(duration.min(MAX_RETRY_AFTER)).unwrap_or(now);
        self.until = Some(match self.until {
            Some(current) if current > proposed => current,
            _ => proposed,
        });
        timers.restart(Task::CooldownTick, Schedule::Every(COOLDOWN_TICK));
        self.countdown_text(now)
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.map_or(false, |until| now < until)
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.until
            .map(|until| until.saturating_duration_since(now))
            .unwrap_or_default()
    }

    pub fn countdown_text(&self, now: Instant) -> String {
        format_cooldown(self.remaining(now))
    }

    /// Handles a countdown tick; stops the tick once the deadline has passed.
    pub fn tick<S: Scheduler>(&mut self, now: Instant, timers: &mut Timers<S>) -> String {
        if !self.is_active(now) {
            timers.cancel(Task::CooldownTick);
            return String::new();
        }
        self.countdown_text(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Clock;
    use crate::testing::{ManualClock, ManualScheduler};

    #[test]
    fn test_extend_never_moves_deadline_back() {
        let clock = ManualClock::default();
        let mut timers = Timers::new(ManualScheduler::default());
        let mut cooldown = CooldownManager::default();

        let mut last = None;
        for (advance_ms, extend_ms) in [(0, 30_000), (1_000, 3_000), (0, 45_000), (10_000, 1), (40_000, 500)] {
            clock.advance(Duration::from_millis(advance_ms));
            cooldown.extend(Duration::from_millis(extend_ms), clock.now(), &mut timers);
            let until = cooldown.until();
            assert!(until >= last);
            last = until;
        }
    }

    #[test]
    fn test_duplicate_response_cannot_shorten() {
        let clock = ManualClock::default();
        let mut timers = Timers::new(ManualScheduler::default());
        let mut cooldown = CooldownManager::default();

        cooldown.extend(Duration::from_secs(45), clock.now(), &mut timers);
        let until = cooldown.until();
        cooldown.extend(Duration::from_secs(3), clock.now(), &mut timers);
        assert_eq!(cooldown.until(), until);
    }

    #[test]
    fn test_extend_caps_oversized_wait() {
        let clock = ManualClock::default();
        let mut timers = Timers::new(ManualScheduler::default());
        let mut cooldown = CooldownManager::default();

        assert_eq!(cooldown.extend(Duration::MAX, clock.now(), &mut timers), "Cooldown: 3600s");
        assert_eq!(cooldown.remaining(clock.now()), MAX_RETRY_AFTER);
    }

    #[test]
    fn test_is_active_matches_deadline() {
        let clock = ManualClock::default();
        let mut timers = Timers::new(ManualScheduler::default());
        let mut cooldown = CooldownManager::default();
        assert!(!cooldown.is_active(clock.now()));

        cooldown.extend(Duration::from_secs(2), clock.now(), &mut timers);
        clock.advance(Duration::from_millis(1999));
        assert!(cooldown.is_active(clock.now()));
        clock.advance(Duration::from_millis(1));
        assert!(!cooldown.is_active(clock.now()));
    }

    #[test]
    fn test_tick_counts_down_and_stops() {
        let clock = ManualClock::default();
        let manual = ManualScheduler::default();
        let mut timers = Timers::new(manual.clone());
        let mut cooldown = CooldownManager::default();

        assert_eq!(cooldown.extend(Duration::from_secs(2), clock.now(), &mut timers), "Cooldown: 2s");
        assert!(manual.is_running(Task::CooldownTick));

        clock.advance(Duration::from_millis(1250));
        assert_eq!(cooldown.tick(clock.now(), &mut timers), "Cooldown: 1s");

        clock.advance(Duration::from_millis(750));
        assert_eq!(cooldown.tick(clock.now(), &mut timers), "");
        assert!(!manual.is_running(Task::CooldownTick));
    }
}
