//! Preset slots
//!
//! Fixed-size preset records packed behind the settings bytes:
//! `{url[64], ip[4], port(2, little-endian)}` per slot, contiguous by slot
//! index. The URL field is NUL-terminated and NUL-padded, so a record
//! written to a slot reads back byte-identically.

use std::net::Ipv4Addr;
use std::path::Path;

use log::info;
use serde::Deserialize;

use skywave::config::preset::URL_LEN;
use skywave::preset::PresetRecord;

use crate::config::store::{PRESET_BASE, PRESET_MAX, SLOT_SIZE};
use crate::data::store::ByteStore;
use crate::error::{AppError, Result};

fn slot_offset(slot: usize) -> Result<usize> {
    if slot >= PRESET_MAX {
        return Err(AppError::Store(format!(
            "preset slot {slot} out of range (0..{PRESET_MAX})"
        )));
    }
    Ok(PRESET_BASE + slot * SLOT_SIZE)
}

/// Load the preset record in `slot`. An unwritten slot reads as an empty
/// record (no URL), which `open` rejects without a connection attempt.
pub fn load_slot<B: ByteStore>(store: &B, slot: usize) -> Result<PresetRecord> {
    let offset = slot_offset(slot)?;
    let mut raw = [0u8; SLOT_SIZE];
    store.read_at(offset, &mut raw)?;

    let url_field = &raw[..URL_LEN];
    let url_end = url_field.iter().position(|&b| b == 0).unwrap_or(URL_LEN);
    let url = String::from_utf8_lossy(&url_field[..url_end]).into_owned();

    let ip4 = Ipv4Addr::new(raw[URL_LEN], raw[URL_LEN + 1], raw[URL_LEN + 2], raw[URL_LEN + 3]);
    let port = u16::from_le_bytes([raw[URL_LEN + 4], raw[URL_LEN + 5]]);

    Ok(PresetRecord { url, ip4, port })
}

/// Save `preset` into `slot`. The URL is truncated to fit the field with
/// its terminator.
pub fn save_slot<B: ByteStore>(store: &mut B, slot: usize, preset: &PresetRecord) -> Result<()> {
    let offset = slot_offset(slot)?;
    let mut raw = [0u8; SLOT_SIZE];

    let url = preset.url.as_bytes();
    let url_len = url.len().min(URL_LEN - 1);
    raw[..url_len].copy_from_slice(&url[..url_len]);

    raw[URL_LEN..URL_LEN + 4].copy_from_slice(&preset.ip4.octets());
    raw[URL_LEN + 4..URL_LEN + 6].copy_from_slice(&preset.port.to_le_bytes());

    store.write_at(offset, &raw)
}

/// One entry of a preset import file.
#[derive(Debug, Deserialize)]
pub struct PresetImport {
    pub slot: usize,
    pub url: String,
    #[serde(default)]
    pub ip: [u8; 4],
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    80
}

/// Write a JSON list of presets into the store image. Returns the number of
/// slots written.
pub fn import_file<B: ByteStore>(store: &mut B, path: &Path) -> Result<usize> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("failed to read {path:?}: {e}")))?;
    let entries: Vec<PresetImport> = serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("failed to parse {path:?}: {e}")))?;

    for entry in &entries {
        let preset = PresetRecord::new(entry.url.clone(), entry.ip, entry.port);
        save_slot(store, entry.slot, &preset)?;
        info!("slot {} <- {}:{}", entry.slot, preset.url, preset.port);
    }
    Ok(entries.len())
}
