//! Control input
//!
//! The physical controls are a multi-click button and a bounded rotary
//! encoder. `Rotary` models the encoder position; `KeyInput` maps terminal
//! keys onto the same events so the control loop is agnostic about where a
//! turn or press came from.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

/// Button press classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonPress {
    /// Short press: play
    Short,
    /// Press and hold: stop
    Long,
    /// Double press: toggle preset/volume selection mode
    Double,
}

/// One input event per control-loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Button(ButtonPress),
    /// Rotary turned by this many detents (positive = clockwise)
    Turn(i32),
    Quit,
}

/// Poll-style input source.
pub trait InputDevice {
    fn poll(&mut self) -> io::Result<Option<ControlEvent>>;
}

/// Bounded rotary encoder position.
///
/// The range is reconfigured when the selection mode changes: presets use a
/// wrapping 0..max range with unit steps, volume a clamped range with
/// coarser detents.
#[derive(Debug)]
pub struct Rotary {
    min: i32,
    max: i32,
    wrap: bool,
    step: i32,
    pos: i32,
}

impl Rotary {
    pub fn new(min: i32, max: i32, wrap: bool, step: i32) -> Self {
        Self {
            min,
            max,
            wrap,
            step,
            pos: min,
        }
    }

    /// Reconfigure the bounds, clamping the current position into them.
    pub fn set_range(&mut self, min: i32, max: i32, wrap: bool, step: i32) {
        self.min = min;
        self.max = max;
        self.wrap = wrap;
        self.step = step;
        self.pos = self.pos.clamp(min, max);
    }

    pub fn set_position(&mut self, pos: i32) {
        self.pos = pos.clamp(self.min, self.max);
    }

    pub fn position(&self) -> i32 {
        self.pos
    }

    /// Apply `detents` turns. Wrapping ranges roll over; clamped ranges
    /// stick at the bounds.
    pub fn turn(&mut self, detents: i32) {
        let span = self.max - self.min + 1;
        let next = self.pos + detents * self.step;
        self.pos = if self.wrap {
            self.min + (next - self.min).rem_euclid(span)
        } else {
            next.clamp(self.min, self.max)
        };
    }
}

/// Terminal keyboard mapped onto the button/rotary events.
///
/// Enter/space press the button, `s` holds it, Tab or `m` double-press it,
/// the arrow keys (or `+`/`-`) turn the rotary, `q`/Esc quits.
#[derive(Default)]
pub struct KeyInput;

impl KeyInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputDevice for KeyInput {
    fn poll(&mut self) -> io::Result<Option<ControlEvent>> {
        if !event::poll(Duration::ZERO)? {
            return Ok(None);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(None);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }
        let event = match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => ControlEvent::Button(ButtonPress::Short),
            KeyCode::Char('s') => ControlEvent::Button(ButtonPress::Long),
            KeyCode::Tab | KeyCode::Char('m') => ControlEvent::Button(ButtonPress::Double),
            KeyCode::Up | KeyCode::Char('+') | KeyCode::Char('=') => ControlEvent::Turn(1),
            KeyCode::Down | KeyCode::Char('-') => ControlEvent::Turn(-1),
            KeyCode::Char('q') | KeyCode::Esc => ControlEvent::Quit,
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}
