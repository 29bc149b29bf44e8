//! Skywave — Internet Radio Engine
//!
//! ICY/Shoutcast stream client for poll-driven hosts: connection lifecycle,
//! response header parsing, and the audio/metadata demultiplexer.
//!
//! ## Quick start
//!
//! ```no_run
//! use skywave::audio::NullSink;
//! use skywave::icy::IcyClient;
//! use skywave::net::TcpSocket;
//! use skywave::preset::PresetRecord;
//!
//! let preset = PresetRecord::new("ice1.somafm.com/groovesalad-128-mp3", [0, 0, 0, 0], 80);
//! let mut radio = IcyClient::new(TcpSocket::new());
//! let mut sink = NullSink::new();
//! radio.open(&preset)?;
//! while radio.connected() {
//!     radio.poll(&mut sink)?;
//! }
//! # Ok::<(), skywave::error::RadioError>(())
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod icy;
pub mod net;
pub mod preset;
pub mod station;
