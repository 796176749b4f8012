pub mod constants;
pub mod rate_limit;
pub mod shared_word_game;
pub mod validation;
