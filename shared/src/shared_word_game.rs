use serde::{Deserialize, Serialize};

use crate::rate_limit::CooldownDetail;

/// Per-letter feedback for a scored guess.
///
/// Variants are declared weakest first so the derived ordering is the hint
/// strength used to colour the keyboard: `Absent < Present < Correct`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LetterStatus {
    Absent,
    Present,
    Correct,
}

impl LetterStatus {
    pub fn rank(self) -> u8 {
        match self {
            Self::Absent => 1,
            Self::Present => 2,
            Self::Correct => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Present => "present",
            Self::Correct => "correct",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LevelDescriptor {
    pub level: u32,
    // Target word length
    pub length: usize,
    pub max_attempts: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LevelsResponse {
    #[serde(default)]
    pub total: Option<u32>,
    pub levels: Vec<LevelDescriptor>,
}

/// One scored guess as recorded by the server.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Attempt {
    #[serde(default)]
    pub guess: String,
    #[serde(default)]
    pub result: Vec<LetterStatus>,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct BotProgress {
    pub solved: u32,
    pub total: u32,
    #[serde(default)]
    pub seconds_left: Option<u64>,
    #[serde(default)]
    pub finished: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PlayerProgress {
    #[serde(default)]
    pub solved_levels: Vec<u32>,
}

/// Body of `GET /api/state`; `levels` is only present for `?full=1`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StateResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub levels: Option<Vec<LevelDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    pub bot: BotProgress,
    #[serde(default)]
    pub player: PlayerProgress,
}

/// Body of `GET /api/level_state?level=N`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct LevelStateResponse {
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub max_attempts: Option<usize>,
    #[serde(default)]
    pub attempts: Vec<Attempt>,
    #[serde(default)]
    pub solved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot: Option<BotProgress>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GuessRequest {
    pub level: u32,
    pub guess: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GuessResponse {
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub guess: Option<String>,
    pub result: Vec<LetterStatus>,
    pub is_correct: bool,
}

/// Error body returned with any non-2xx status.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<ErrorDetail>,
}

/// `detail` is a plain message for most rejections and an object for cooldowns.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Cooldown(CooldownDetail),
    Other(serde_json::Value),
}

impl ErrorDetail {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message(message) => Some(message),
            _ => None,
        }
    }

    pub fn cooldown(&self) -> Option<&CooldownDetail> {
        match self {
            Self::Cooldown(detail) if detail.is_cooldown() => Some(detail),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strength_order() {
        assert!(LetterStatus::Correct > LetterStatus::Present);
        assert!(LetterStatus::Present > LetterStatus::Absent);
        assert_eq!(LetterStatus::Present.rank(), 2);
    }

    #[test]
    fn test_full_state_payload() {
        let raw = r#"{
            "player": {"solved_levels": [1, 2]},
            "bot": {"solved": 3, "total": 12, "seconds_left": 100, "finished": false},
            "total": 12,
            "levels": [{"level": 1, "length": 5, "max_attempts": 6}]
        }"#;
        let state: StateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(state.player.solved_levels, vec![1, 2]);
        assert_eq!(state.bot.solved, 3);
        assert_eq!(state.levels.unwrap()[0].length, 5);
    }

    #[test]
    fn test_partial_state_payload_has_no_levels() {
        let raw = r#"{"player": {"solved_levels": []}, "bot": {"solved": 0, "total": 12, "finished": false}}"#;
        let state: StateResponse = serde_json::from_str(raw).unwrap();
        assert!(state.levels.is_none());
        assert!(state.player.solved_levels.is_empty());
    }

    #[test]
    fn test_level_state_attempts() {
        let raw = r#"{"level": 2, "max_attempts": 6, "solved": false, "attempts": [
            {"guess": "TRAIN", "result": ["correct", "absent", "present", "absent", "absent"], "is_correct": false}
        ]}"#;
        let state: LevelStateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(state.attempts.len(), 1);
        assert_eq!(state.attempts[0].result[2], LetterStatus::Present);
    }

    #[test]
    fn test_error_detail_variants() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "Locked level"}"#).unwrap();
        assert_eq!(body.detail.unwrap().message(), Some("Locked level"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": {"error": "cooldown", "retry_after": 45}}"#).unwrap();
        let detail = body.detail.unwrap();
        assert_eq!(detail.message(), None);
        assert_eq!(detail.cooldown().and_then(|c| c.retry_after), Some(45.0));

        let body: ErrorBody = serde_json::from_str(r#"{"detail": [1, 2]}"#).unwrap();
        assert!(matches!(body.detail, Some(ErrorDetail::Other(_))));
    }
}
