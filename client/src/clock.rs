use std::time::Instant;

/// Source of "now" for cooldown math.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Reads tokio's clock so paused-time tests and the runtime agree.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}
