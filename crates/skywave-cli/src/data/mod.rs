//! Persistence layer
//!
//! A fixed-size byte image (an EEPROM stand-in) holds the user settings at
//! known offsets and an array of fixed-size preset slots behind them.

pub mod presets;
pub mod settings;
pub mod store;

pub use settings::Settings;
pub use store::{ByteStore, FileStore, MemStore};
