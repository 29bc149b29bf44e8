//! User settings
//!
//! Two bytes at the front of the store image: the selected preset slot and
//! the volume. Volume is stored on the attenuation scale (higher = quieter),
//! the convention of the decoder hardware this layout originated on.

use crate::config::store::{PRESET_MAX, PRESET_OFFSET, VOLUME_OFFSET};
use crate::config::volume;
use crate::data::store::ByteStore;
use crate::error::Result;

/// Persisted user settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Selected preset slot
    pub preset: u8,
    /// Volume as attenuation, 0 (loudest) to `volume::MAX` (silent)
    pub volume: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: 0,
            volume: 50,
        }
    }
}

impl Settings {
    /// Load from the store, clamping out-of-range stored values.
    pub fn load<B: ByteStore>(store: &B) -> Result<Self> {
        let mut bytes = [0u8; 2];
        store.read_at(PRESET_OFFSET, &mut bytes[..1])?;
        store.read_at(VOLUME_OFFSET, &mut bytes[1..])?;
        Ok(Self {
            preset: bytes[0].min(PRESET_MAX as u8 - 1),
            volume: bytes[1].min(volume::MAX),
        })
    }

    /// Save to the store (the image persists on its next flush).
    pub fn save<B: ByteStore>(&self, store: &mut B) -> Result<()> {
        store.write_at(PRESET_OFFSET, &[self.preset])?;
        store.write_at(VOLUME_OFFSET, &[self.volume])?;
        Ok(())
    }
}
