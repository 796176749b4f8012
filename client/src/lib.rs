pub mod api;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod console;
pub mod cooldown;
pub mod engine;
pub mod error;
pub mod game_board;
pub mod keyboard;
pub mod logging;
pub mod notice;
pub mod ports;
pub mod runtime;
pub mod scheduler;
pub mod session;

#[cfg(test)]
mod testing;
