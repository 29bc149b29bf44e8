//! Character panel
//!
//! A fixed 20x4 grid in a character-LCD layout:
//!
//! ```text
//! |   Station Name     |
//! |genre / now playing |
//! |  -  Bit Rate 128 - |
//! |CHANNEL = 1  VOL = 30|
//! ```
//!
//! Row composition is pure string work; `TermPanel` writes the four rows at
//! fixed coordinates with crossterm.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::Print;
use crossterm::QueueableCommand;

use crate::config::panel::{COLS, ROWS};
use crate::config::volume;

/// Everything the panel shows for one refresh.
#[derive(Debug, Clone, Copy)]
pub struct PanelState<'a> {
    pub name: &'a str,
    /// Genre or now-playing text; scrolls when wider than the panel
    pub info: &'a str,
    pub rate: &'a str,
    /// Drives the heartbeat blink; steady when stalled
    pub receiving: bool,
    /// Current preset slot (shown 1-based)
    pub preset: u8,
    /// Attenuation; shown inverted as a loudness percentage
    pub volume: u8,
}

/// Panel compositor: holds the scroll position and blink phase.
#[derive(Debug, Default)]
pub struct Panel {
    tick: usize,
    scroll_len: usize,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart the scroll cycle, e.g. when a new title arrives.
    pub fn reset_scroll(&mut self) {
        self.tick = 0;
    }

    /// Compose the four rows for this refresh and advance scroll/blink.
    pub fn compose(&mut self, state: &PanelState) -> [String; ROWS] {
        self.scroll_len = state.info.chars().count().saturating_sub(COLS);

        let info = if self.scroll_len > 0 {
            // hold for two ticks at each end, slide in between
            let offset = self.tick.saturating_sub(2).min(self.scroll_len);
            window(state.info, offset, COLS)
        } else {
            fill(state.info, COLS, true)
        };

        let beat = if state.receiving && self.tick % 2 == 1 {
            '-'
        } else {
            ' '
        };
        let mut row2 = fill("", COLS, false);
        overlay(&mut row2, 2, &beat.to_string());
        overlay(&mut row2, 4, "Bit Rate");
        overlay(&mut row2, 13, state.rate);
        overlay(&mut row2, 17, &beat.to_string());

        let mut row3 = fill("", COLS, false);
        overlay(&mut row3, 0, &format!("CHANNEL = {}", state.preset + 1));
        overlay(
            &mut row3,
            12,
            &format!("VOL = {}", volume::MAX.saturating_sub(state.volume)),
        );

        self.tick = (self.tick + 1) % (self.scroll_len + 4);

        [fill(state.name, COLS, true), info, row2, row3]
    }
}

/// Pad (and truncate) `s` to exactly `width` characters, optionally
/// centered.
pub fn fill(s: &str, width: usize, center: bool) -> String {
    let s: String = s.chars().take(width).collect();
    let pad = width - s.chars().count();
    if center {
        let left = pad / 2;
        format!("{}{}{}", " ".repeat(left), s, " ".repeat(pad - left))
    } else {
        format!("{}{}", s, " ".repeat(pad))
    }
}

/// A `width`-character window into `s` starting at char `offset`.
fn window(s: &str, offset: usize, width: usize) -> String {
    let tail: String = s.chars().skip(offset).take(width).collect();
    fill(&tail, width, false)
}

/// Write `text` into `row` starting at char column `col`, clipped to the
/// row width.
fn overlay(row: &mut String, col: usize, text: &str) {
    let mut chars: Vec<char> = row.chars().collect();
    for (i, c) in text.chars().enumerate() {
        if col + i >= chars.len() {
            break;
        }
        chars[col + i] = c;
    }
    *row = chars.into_iter().collect();
}

/// Renders panel rows at fixed terminal coordinates.
pub struct TermPanel<W: Write> {
    out: W,
}

impl<W: Write> TermPanel<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn render(&mut self, rows: &[String; ROWS]) -> io::Result<()> {
        for (y, row) in rows.iter().enumerate() {
            self.out.queue(MoveTo(0, y as u16))?.queue(Print(row))?;
        }
        self.out.flush()
    }
}
