//! Boundary to the presentation layer. The engine pushes render data and
//! notices through these traits and never reads anything back.

use std::collections::BTreeSet;
use std::time::Duration;

use zeronight_shared::constants::{AI_BODY, AI_TITLE, LOSE_BODY, LOSE_TITLE, WIN_BODY, WIN_TITLE};

use crate::catalog::LevelCatalog;
use crate::game_board::Board;
use crate::keyboard::KeyboardHints;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelNode {
    pub level: u32,
    pub solved: bool,
    pub current: bool,
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTrack {
    pub unlock_pointer: u32,
    pub nodes: Vec<LevelNode>,
}

impl LevelTrack {
    pub fn build(catalog: &LevelCatalog, solved: &BTreeSet<u32>, current_level: u32) -> Self {
        let unlock_pointer = catalog.next_unlocked(solved);
        let nodes = catalog
            .levels()
            .iter()
            .map(|l| {
                let is_solved = solved.contains(&l.level);
                LevelNode {
                    level: l.level,
                    solved: is_solved,
                    current: l.level == current_level,
                    locked: !(is_solved || l.level == unlock_pointer),
                }
            })
            .collect();
        Self { unlock_pointer, nodes }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Win,
    Lose,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultDialog {
    pub kind: DialogKind,
    pub title: String,
    pub body: String,
}

impl ResultDialog {
    fn new(kind: DialogKind, title: &str, body: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            body: body.to_string(),
        }
    }

    pub fn win() -> Self {
        Self::new(DialogKind::Win, WIN_TITLE, WIN_BODY)
    }

    pub fn lose() -> Self {
        Self::new(DialogKind::Lose, LOSE_TITLE, LOSE_BODY)
    }

    pub fn ai() -> Self {
        Self::new(DialogKind::Ai, AI_TITLE, AI_BODY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeOptions {
    pub auto_hide: bool,
    pub timeout: Duration,
}

pub trait RenderPort {
    fn render_board(&mut self, board: &Board);
    fn render_keyboard_hints(&mut self, hints: &KeyboardHints);
    fn render_level_track(&mut self, track: &LevelTrack);
    fn render_bot_track(&mut self, solved: u32, total: u32);
    /// Countdown text such as `Cooldown: 12s`; empty when no cooldown is running.
    fn render_cooldown(&mut self, text: &str);
}

pub trait NoticePort {
    fn notify(&mut self, message: &str, options: NoticeOptions);
    fn clear_notice(&mut self);
    fn show_result_dialog(&mut self, dialog: &ResultDialog);
}

pub trait GameView: RenderPort + NoticePort {}

impl<T: RenderPort + NoticePort> GameView for T {}
