use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client-side wait applied after every scored guess.
pub const GUESS_COOLDOWN: Duration = Duration::from_secs(30);
/// Used when a cooldown rejection carries no usable `retry_after`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(30);
/// Longest wait honored from a server hint or a local cooldown.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(60 * 60);
pub const COOLDOWN_TICK: Duration = Duration::from_millis(250);

pub const COOLDOWN_ERROR_TAG: &str = "cooldown";

/// `detail` object of a 429 response: `{"error": "cooldown", "retry_after": 45}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CooldownDetail {
    pub error: String,
    #[serde(default)]
    pub retry_after: Option<f64>,
}

impl CooldownDetail {
    pub fn is_cooldown(&self) -> bool {
        self.error == COOLDOWN_ERROR_TAG
    }

    /// Server wait capped at [`MAX_RETRY_AFTER`], falling back to
    /// [`DEFAULT_RETRY_AFTER`] for missing, zero or non-finite values.
    pub fn retry_after(&self) -> Duration {
        retry_after_or_default(self.retry_after)
    }
}

pub fn retry_after_or_default(seconds: Option<f64>) -> Duration {
    match seconds {
        Some(secs) if secs.is_finite() && secs > 0.0 => Duration::try_from_secs_f64(secs)
            .map_or(MAX_RETRY_AFTER, |wait| wait.min(MAX_RETRY_AFTER)),
        _ => DEFAULT_RETRY_AFTER,
    }
}

/// Whole seconds left, rounded up so "0s" is never shown while still waiting.
pub fn remaining_seconds(remaining: Duration) -> u64 {
    let millis = remaining.as_millis() as u64;
    (millis + 999) / 1000
}

pub fn format_cooldown(remaining: Duration) -> String {
    let secs = remaining_seconds(remaining);
    if secs == 0 {
        String::new()
    } else {
        format!("Cooldown: {}s", secs)
    }
}
