pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
pub const LEVELS_ENDPOINT: &str = "/api/levels";
pub const STATE_ENDPOINT: &str = "/api/state";
pub const LEVEL_STATE_ENDPOINT: &str = "/api/level_state";
pub const GUESS_ENDPOINT: &str = "/api/guess";

// `detail` strings the server uses for rejections the client reacts to
pub const DETAIL_AI_FINISHED: &str = "AI finished";
pub const DETAIL_LOCKED_LEVEL: &str = "Locked level";
pub const DETAIL_NO_ATTEMPTS_LEFT: &str = "No attempts left";
pub const DETAIL_ALREADY_SOLVED: &str = "Already solved";

pub const AI_FINISHED_NOTICE: &str = "AI finished first. Everyone loses.";
pub const ALREADY_SOLVED_NOTICE: &str = "This level is already solved.";
pub const LOCKED_NAVIGATION_NOTICE: &str = "Locked. Solve previous levels first.";
pub const LOCKED_GUESS_NOTICE: &str = "Locked. Solve the next available level first.";
pub const NO_ATTEMPTS_NOTICE: &str = "No attempts left for this level.";
pub const TRY_AGAIN_NOTICE: &str = "Try again";
pub const INVALID_GUESS_NOTICE: &str = "Invalid guess";
pub const NETWORK_ERROR: &str = "Network error";
pub const LOAD_FAILED_NOTICE: &str = "Failed to load game state";

pub const WIN_TITLE: &str = "Correct!";
pub const WIN_BODY: &str = "Level cleared.";
pub const LOSE_TITLE: &str = "No attempts left";
pub const LOSE_BODY: &str = "No more attempts for this level.";
pub const AI_TITLE: &str = "Too late";
pub const AI_BODY: &str = "The AI reached the seed phrase first.";

pub fn need_letters_notice(length: usize) -> String {
    format!("Need {} letters.", length)
}
