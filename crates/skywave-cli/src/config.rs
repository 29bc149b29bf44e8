//! Configuration constants for the skywave frontend

/// Application metadata
pub mod app {
    /// Application name (used for the config directory)
    pub const NAME: &str = "skywave";

    /// Preset/settings image file name inside the config directory
    pub const STORE_FILE: &str = "presets.bin";
}

/// Persistent store geometry (EEPROM-style byte image)
pub mod store {
    use skywave::config::preset::URL_LEN;

    /// Number of preset slots
    pub const PRESET_MAX: usize = 8;

    /// Byte offset of the selected-preset setting
    pub const PRESET_OFFSET: usize = 0;

    /// Byte offset of the volume setting
    pub const VOLUME_OFFSET: usize = 1;

    /// Byte offset of the first preset slot
    pub const PRESET_BASE: usize = 2;

    /// Bytes per preset slot: url field, IPv4 address, port
    pub const SLOT_SIZE: usize = URL_LEN + 4 + 2;

    /// Total image size
    pub const IMAGE_SIZE: usize = PRESET_BASE + PRESET_MAX * SLOT_SIZE;
}

/// Volume bounds (attenuation scale: higher = quieter)
pub mod volume {
    /// Maximum attenuation (silent)
    pub const MAX: u8 = 100;

    /// Attenuation change per rotary detent
    pub const STEP: i32 = 10;
}

/// Control-loop timing
pub mod timers {
    use std::time::Duration;

    /// Settings are persisted at this period
    pub const SAVE_PERIOD: Duration = Duration::from_secs(10);

    /// Panel refresh period (also the scroll/blink cadence)
    pub const DISPLAY_PERIOD: Duration = Duration::from_millis(500);

    /// Control-loop iteration sleep
    pub const TICK: Duration = Duration::from_millis(10);
}

/// Character panel geometry
pub mod panel {
    /// Visible columns
    pub const COLS: usize = 20;

    /// Visible rows
    pub const ROWS: usize = 4;
}
