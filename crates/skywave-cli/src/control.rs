//! Control loop
//!
//! One cooperative, single-threaded controller ticked by the binary: each
//! iteration steps the radio by at most one bounded read, applies at most
//! one input event, and time-slices persistence and panel refresh with
//! elapsed-time checks. Nothing here blocks.

use std::time::{Duration, Instant};

use log::{debug, info, warn};

use skywave::audio::AudioSink;
use skywave::icy::IcyClient;
use skywave::net::StreamSocket;
use skywave::preset::PresetRecord;

use crate::config::panel::ROWS;
use crate::config::store::PRESET_MAX;
use crate::config::timers::{DISPLAY_PERIOD, SAVE_PERIOD};
use crate::config::volume;
use crate::data::{presets, ByteStore, Settings};
use crate::error::Result;
use crate::input::{ButtonPress, ControlEvent, Rotary};
use crate::panel::{Panel, PanelState};

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Stopped,
    Playing,
}

/// What the rotary currently selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    Preset,
    Volume,
}

/// The cooperative controller: owns the radio, the sink, the store, and the
/// input/display models.
pub struct Controller<S: StreamSocket, B: ByteStore> {
    radio: IcyClient<S>,
    sink: Box<dyn AudioSink>,
    store: B,
    settings: Settings,
    active: PresetRecord,
    rotary: Rotary,
    mode: SelectMode,
    state: PlayerState,
    panel: Panel,
    last_save: Instant,
    last_draw: Instant,
    save_period: Duration,
    draw_period: Duration,
    running: bool,
}

impl<S: StreamSocket, B: ByteStore> Controller<S, B> {
    pub fn new(radio: IcyClient<S>, mut sink: Box<dyn AudioSink>, store: B) -> Result<Self> {
        let settings = Settings::load(&store)?;
        let active = presets::load_slot(&store, settings.preset as usize)?;
        sink.set_volume(settings.volume);

        let mut rotary = Rotary::new(0, PRESET_MAX as i32 - 1, true, 1);
        rotary.set_position(settings.preset as i32);

        info!(
            "preset {} ({}), volume {}",
            settings.preset + 1,
            if active.url.is_empty() { "empty" } else { &active.url },
            settings.volume
        );

        Ok(Self {
            radio,
            sink,
            store,
            settings,
            active,
            rotary,
            mode: SelectMode::Preset,
            state: PlayerState::Stopped,
            panel: Panel::new(),
            last_save: Instant::now(),
            last_draw: Instant::now(),
            save_period: SAVE_PERIOD,
            draw_period: DISPLAY_PERIOD,
            running: true,
        })
    }

    /// One control-loop iteration. Returns freshly composed panel rows when
    /// the display timer fired.
    pub fn tick(&mut self, event: Option<ControlEvent>) -> Option<[String; ROWS]> {
        if let Some(event) = event {
            self.handle_event(event);
        }

        if self.state == PlayerState::Playing {
            self.step_radio();
        }

        if self.last_save.elapsed() >= self.save_period {
            self.last_save = Instant::now();
            self.persist();
        }

        if self.last_draw.elapsed() >= self.draw_period {
            self.last_draw = Instant::now();
            return Some(self.compose_panel());
        }
        None
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Start playback; the stream opens on the next tick.
    pub fn play(&mut self) {
        self.state = PlayerState::Playing;
    }

    /// Select a preset slot, replacing the active station.
    pub fn select_preset(&mut self, slot: u8) -> Result<()> {
        self.active = presets::load_slot(&self.store, slot as usize)?;
        self.settings.preset = slot;
        if self.mode == SelectMode::Preset {
            self.rotary.set_position(slot as i32);
        }
        self.radio.stop(self.sink.as_mut());
        Ok(())
    }

    /// Set the volume (attenuation scale).
    pub fn set_volume(&mut self, attenuation: u8) {
        self.settings.volume = attenuation.min(volume::MAX);
        self.sink.set_volume(self.settings.volume);
        if self.mode == SelectMode::Volume {
            self.rotary.set_position(self.settings.volume as i32);
        }
    }

    fn handle_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Button(ButtonPress::Short) => {
                self.state = PlayerState::Playing;
            }
            ControlEvent::Button(ButtonPress::Long) => {
                self.state = PlayerState::Stopped;
                self.radio.stop(self.sink.as_mut());
            }
            ControlEvent::Button(ButtonPress::Double) => self.toggle_mode(),
            ControlEvent::Turn(detents) => self.handle_turn(detents),
            ControlEvent::Quit => {
                self.radio.stop(self.sink.as_mut());
                self.persist();
                self.running = false;
            }
        }
    }

    fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            SelectMode::Preset => {
                self.rotary
                    .set_range(0, volume::MAX as i32, false, volume::STEP);
                self.rotary.set_position(self.settings.volume as i32);
                SelectMode::Volume
            }
            SelectMode::Volume => {
                self.rotary.set_range(0, PRESET_MAX as i32 - 1, true, 1);
                self.rotary.set_position(self.settings.preset as i32);
                SelectMode::Preset
            }
        };
        debug!("select mode: {:?}", self.mode);
    }

    fn handle_turn(&mut self, detents: i32) {
        match self.mode {
            SelectMode::Preset => {
                self.rotary.turn(detents);
                let slot = self.rotary.position() as u8;
                if slot != self.settings.preset {
                    if let Err(e) = self.select_preset(slot) {
                        warn!("preset {slot} unavailable: {e}");
                    }
                }
            }
            SelectMode::Volume => {
                // clockwise = louder = less attenuation
                self.rotary.turn(-detents);
                self.settings.volume = self.rotary.position() as u8;
                self.sink.set_volume(self.settings.volume);
            }
        }
    }

    /// Step the stream: poll while connected, otherwise reconnect. A failed
    /// open is retried on the next iteration.
    fn step_radio(&mut self) {
        if self.radio.connected() {
            if let Err(e) = self.radio.poll(self.sink.as_mut()) {
                warn!("stream error: {e}");
            }
        } else {
            self.radio.stop(self.sink.as_mut());
            if let Err(e) = self.radio.open(&self.active) {
                debug!("open failed: {e}");
            }
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.settings.save(&mut self.store) {
            warn!("settings save failed: {e}");
            return;
        }
        if let Err(e) = self.store.flush() {
            warn!("store flush failed: {e}");
        }
    }

    fn compose_panel(&mut self) -> [String; ROWS] {
        if self.radio.station_mut().take_update() {
            self.panel.reset_scroll();
            info!("now playing: {}", self.radio.station().now_playing());
        }

        let station = self.radio.station();
        let info = if station.now_playing().is_empty() {
            station.genre()
        } else {
            station.now_playing()
        };
        let state = PanelState {
            name: station.name(),
            info,
            rate: station.bitrate(),
            receiving: self.radio.receiving(),
            preset: self.settings.preset,
            volume: self.settings.volume,
        };
        self.panel.compose(&state)
    }
}

#[cfg(test)]
impl<S: StreamSocket, B: ByteStore> Controller<S, B> {
    fn with_timers(mut self, save: Duration, draw: Duration) -> Self {
        self.save_period = save;
        self.draw_period = draw;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::store::IMAGE_SIZE;
    use crate::data::MemStore;
    use skywave::audio::NullSink;
    use std::io;
    use std::net::Ipv4Addr;

    /// Socket double: accepts connections, replays queued chunks.
    #[derive(Default)]
    struct FakeSocket {
        connected: bool,
        connects: usize,
        sent: Vec<u8>,
        chunks: Vec<Vec<u8>>,
    }

    impl StreamSocket for FakeSocket {
        fn connect(&mut self, _host: &str, _fallback: Ipv4Addr, _port: u16) -> io::Result<()> {
            self.connects += 1;
            self.connected = true;
            Ok(())
        }

        fn send(&mut self, data: &[u8]) -> io::Result<()> {
            self.sent.extend_from_slice(data);
            Ok(())
        }

        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.chunks.is_empty() {
                return Ok(0);
            }
            let chunk = self.chunks.remove(0);
            let n = buf.len().min(chunk.len());
            buf[..n].copy_from_slice(&chunk[..n]);
            Ok(n)
        }

        fn connected(&self) -> bool {
            self.connected
        }

        fn close(&mut self) {
            self.connected = false;
        }
    }

    fn seeded_store() -> MemStore {
        let mut store = MemStore::new(IMAGE_SIZE);
        for (slot, url) in [(0, "one.example/a"), (1, "two.example/b")] {
            presets::save_slot(
                &mut store,
                slot,
                &PresetRecord::new(url, [10, 0, 0, 1], 8000),
            )
            .unwrap();
        }
        Settings {
            preset: 0,
            volume: 40,
        }
        .save(&mut store)
        .unwrap();
        store
    }

    fn controller() -> Controller<FakeSocket, MemStore> {
        let radio = IcyClient::new(FakeSocket::default());
        Controller::new(radio, Box::new(NullSink::new()), seeded_store())
            .unwrap()
            .with_timers(Duration::from_secs(3600), Duration::from_secs(3600))
    }

    #[test]
    fn new_loads_settings_and_active_preset() {
        let ctl = controller();
        assert_eq!(ctl.settings().preset, 0);
        assert_eq!(ctl.settings().volume, 40);
        assert_eq!(ctl.active.url, "one.example/a");
        assert_eq!(ctl.state(), PlayerState::Stopped);
        assert_eq!(ctl.sink.volume(), 40);
    }

    #[test]
    fn stopped_controller_does_not_connect() {
        let mut ctl = controller();
        ctl.tick(None);
        ctl.tick(None);
        assert_eq!(ctl.radio.socket_mut().connects, 0);
    }

    #[test]
    fn short_press_starts_playback_on_next_tick() {
        let mut ctl = controller();
        ctl.tick(Some(ControlEvent::Button(ButtonPress::Short)));
        assert_eq!(ctl.state(), PlayerState::Playing);
        assert_eq!(ctl.radio.socket_mut().connects, 1);
        assert!(ctl
            .radio.socket_mut()
            .sent
            .starts_with(b"GET /a HTTP/1.0\r\nHost: one.example\r\n"));
    }

    #[test]
    fn long_press_stops_and_closes() {
        let mut ctl = controller();
        ctl.tick(Some(ControlEvent::Button(ButtonPress::Short)));
        ctl.tick(Some(ControlEvent::Button(ButtonPress::Long)));
        assert_eq!(ctl.state(), PlayerState::Stopped);
        assert!(!ctl.radio.connected());
    }

    #[test]
    fn reconnects_while_playing_and_disconnected() {
        let mut ctl = controller();
        ctl.tick(Some(ControlEvent::Button(ButtonPress::Short)));
        assert_eq!(ctl.radio.socket_mut().connects, 1);

        // server drops the connection
        ctl.radio.socket_mut().connected = false;
        ctl.tick(None);
        assert_eq!(ctl.radio.socket_mut().connects, 2);
    }

    #[test]
    fn double_press_toggles_select_mode() {
        let mut ctl = controller();
        assert_eq!(ctl.mode(), SelectMode::Preset);
        ctl.tick(Some(ControlEvent::Button(ButtonPress::Double)));
        assert_eq!(ctl.mode(), SelectMode::Volume);
        ctl.tick(Some(ControlEvent::Button(ButtonPress::Double)));
        assert_eq!(ctl.mode(), SelectMode::Preset);
    }

    #[test]
    fn turn_in_preset_mode_switches_slot() {
        let mut ctl = controller();
        ctl.tick(Some(ControlEvent::Turn(1)));
        assert_eq!(ctl.settings().preset, 1);
        assert_eq!(ctl.active.url, "two.example/b");
    }

    #[test]
    fn preset_wraps_around_the_dial() {
        let mut ctl = controller();
        ctl.tick(Some(ControlEvent::Turn(-1)));
        assert_eq!(ctl.settings().preset, PRESET_MAX as u8 - 1);
    }

    #[test]
    fn turn_in_volume_mode_adjusts_attenuation() {
        let mut ctl = controller();
        ctl.tick(Some(ControlEvent::Button(ButtonPress::Double)));

        // clockwise turn: louder, attenuation drops by one step
        ctl.tick(Some(ControlEvent::Turn(1)));
        assert_eq!(ctl.settings().volume, 30);
        assert_eq!(ctl.sink.volume(), 30);

        ctl.tick(Some(ControlEvent::Turn(-2)));
        assert_eq!(ctl.settings().volume, 50);
    }

    #[test]
    fn volume_clamps_at_the_bounds() {
        let mut ctl = controller();
        ctl.tick(Some(ControlEvent::Button(ButtonPress::Double)));
        for _ in 0..20 {
            ctl.tick(Some(ControlEvent::Turn(1)));
        }
        assert_eq!(ctl.settings().volume, 0);
    }

    #[test]
    fn quit_stops_everything() {
        let mut ctl = controller();
        ctl.tick(Some(ControlEvent::Button(ButtonPress::Short)));
        ctl.tick(Some(ControlEvent::Quit));
        assert!(!ctl.running());
        assert!(!ctl.radio.connected());
    }

    #[test]
    fn display_timer_yields_panel_rows() {
        let radio = IcyClient::new(FakeSocket::default());
        let mut ctl = Controller::new(radio, Box::new(NullSink::new()), seeded_store())
            .unwrap()
            .with_timers(Duration::from_secs(3600), Duration::ZERO);

        let rows = ctl.tick(None).expect("display timer should fire");
        assert_eq!(rows.len(), ROWS);
        assert!(rows[3].starts_with("CHANNEL = 1"));
    }

    #[test]
    fn save_timer_persists_settings() {
        let radio = IcyClient::new(FakeSocket::default());
        let mut ctl = Controller::new(radio, Box::new(NullSink::new()), seeded_store())
            .unwrap()
            .with_timers(Duration::ZERO, Duration::from_secs(3600));

        ctl.tick(Some(ControlEvent::Turn(1)));
        ctl.tick(None);

        let saved = Settings::load(&ctl.store).unwrap();
        assert_eq!(saved.preset, 1);
    }

    #[test]
    fn select_preset_rejects_bad_slot() {
        let mut ctl = controller();
        assert!(ctl.select_preset(PRESET_MAX as u8).is_err());
        // selection unchanged
        assert_eq!(ctl.settings().preset, 0);
    }
}
