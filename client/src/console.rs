//! Line-oriented terminal front end used by the `zeronight` binary.

use std::io::Write;

use tracing::warn;
use zeronight_shared::shared_word_game::LetterStatus;

use crate::engine::Event;
use crate::game_board::Board;
use crate::keyboard::{Key, KeyboardHints, KEYBOARD_ROWS};
use crate::ports::{LevelTrack, NoticeOptions, NoticePort, RenderPort, ResultDialog};

/// Plain-text view. Board tiles print as `LETTER[status]`, blanks as `_`.
pub struct ConsoleView<W: Write> {
    out: W,
    last_cooldown: String,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_cooldown: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            warn!(%err, "console write failed");
        }
    }
}

fn status_tag(status: LetterStatus) -> String {
    format!("[{}]", status.as_str())
}

impl<W: Write> RenderPort for ConsoleView<W> {
    fn render_board(&mut self, board: &Board) {
        let rows: Vec<String> = board
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|tile| match (tile.letter, tile.status) {
                        (Some(letter), Some(status)) => format!("{}{}", letter, status_tag(status)),
                        (Some(letter), None) => letter.to_string(),
                        (None, _) => "_".to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        for row in rows {
            self.line(&row);
        }
    }

    fn render_keyboard_hints(&mut self, hints: &KeyboardHints) {
        if hints.is_empty() {
            return;
        }
        for row in KEYBOARD_ROWS {
            let keys = row
                .chars()
                .map(|letter| match hints.get(letter) {
                    Some(status) => format!("{}{}", letter, status_tag(status)),
                    None => letter.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            self.line(&keys);
        }
    }

    fn render_level_track(&mut self, track: &LevelTrack) {
        let nodes = track
            .nodes
            .iter()
            .map(|node| {
                let mut label = node.level.to_string();
                if node.current {
                    label.insert(0, '>');
                }
                if node.solved {
                    label.push('+');
                } else if node.locked {
                    label.push('#');
                }
                label
            })
            .collect::<Vec<_>>()
            .join(" ");
        self.line(&format!("Levels: {}", nodes));
    }

    fn render_bot_track(&mut self, solved: u32, total: u32) {
        self.line(&format!("Bot: {}/{}", solved, total));
    }

    fn render_cooldown(&mut self, text: &str) {
        if text == self.last_cooldown {
            return;
        }
        let was_waiting = !self.last_cooldown.is_empty();
        self.last_cooldown = text.to_string();
        if !text.is_empty() {
            self.line(text);
        } else if was_waiting {
            self.line("Ready");
        }
    }
}

impl<W: Write> NoticePort for ConsoleView<W> {
    fn notify(&mut self, message: &str, _options: NoticeOptions) {
        self.line(&format!("! {}", message));
    }

    // Printed lines cannot be taken back
    fn clear_notice(&mut self) {}

    fn show_result_dialog(&mut self, dialog: &ResultDialog) {
        self.line(&format!("== {} ==", dialog.title));
        self.line(&dialog.body);
    }
}

/// Turns one input line into engine events.
///
/// `enter` (or an empty line), `back`, `next`, `goto N` and `quit` are
/// commands, and a lone letter is that key. Any other run of letters is typed
/// into the guess; prefix it with `'` to type a word that collides with a
/// command. Returns `None` for input that means nothing.
pub fn events_from_line(line: &str) -> Option<Vec<Event>> {
    let line = line.trim();
    let lowered = line.to_ascii_lowercase();
    let mut words = lowered.split_whitespace();

    let events = match (words.next(), words.next(), words.next()) {
        (None, _, _) => vec![Event::Key(Key::Enter)],
        (Some("next"), None, _) => vec![Event::AdvanceToNext],
        (Some("quit"), None, _) => vec![Event::Shutdown],
        (Some("goto"), Some(level), None) => vec![Event::Navigate(level.parse().ok()?)],
        (Some("goto"), _, _) => return None,
        (Some(word), None, _) => match (word.strip_prefix('\''), Key::from_label(word)) {
            (None, Some(key)) => vec![Event::Key(key)],
            (literal, _) => {
                let word = literal.unwrap_or(word);
                if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
                    return None;
                }
                word.chars().map(|c| Event::Key(Key::Letter(c))).collect()
            }
        },
        _ => return None,
    };
    Some(events)
}
