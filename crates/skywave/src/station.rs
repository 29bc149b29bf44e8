//! Station display state
//!
//! The display-facing fields the stream parsers fill in: station name,
//! genre, bit rate, and the inline now-playing title.

use crate::config::station::{GENRE_LEN, NAME_LEN, RATE_LEN, TITLE_LEN};

/// Display-facing station fields.
///
/// Mutated only by header and metadata parsing; read by the display
/// collaborator through the accessors. The dirty flag is consumed once per
/// update via [`StationInfo::take_update`], so a display refreshes exactly
/// once per change.
#[derive(Debug, Clone, Default)]
pub struct StationInfo {
    name: String,
    genre: String,
    bitrate: String,
    now_playing: String,
    dirty: bool,
}

impl StationInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn bitrate(&self) -> &str {
        &self.bitrate
    }

    pub fn now_playing(&self) -> &str {
        &self.now_playing
    }

    /// True once per update: consumes the dirty flag.
    pub fn take_update(&mut self) -> bool {
        let dirty = self.dirty;
        self.dirty = false;
        dirty
    }

    pub(crate) fn set_name(&mut self, value: &str) {
        self.name = bounded(value, NAME_LEN);
    }

    pub(crate) fn set_genre(&mut self, value: &str) {
        self.genre = bounded(value, GENRE_LEN);
    }

    pub(crate) fn set_bitrate(&mut self, value: &str) {
        self.bitrate = bounded(value, RATE_LEN);
    }

    /// Update the now-playing title; the dirty flag is raised only when the
    /// bounded value actually changed.
    pub(crate) fn set_now_playing(&mut self, value: &str) {
        let value = bounded(value, TITLE_LEN);
        if value != self.now_playing {
            self.now_playing = value;
            self.dirty = true;
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Reset all fields for a new session.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Copy `value` truncated to at most `max` bytes on a char boundary.
fn bounded(value: &str, max: usize) -> String {
    if value.len() <= max {
        return value.to_string();
    }
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].to_string()
}
