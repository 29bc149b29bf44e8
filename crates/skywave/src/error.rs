//! Error types for the skywave engine
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// Main error type for the skywave engine.
///
/// Nothing here is fatal to the process: every variant degrades to "not
/// currently playing" and is cleared by a fresh `open`.
#[derive(Error, Debug)]
pub enum RadioError {
    #[error("Preset has no URL")]
    EmptyUrl,

    #[error("Invalid stream URL {0:?}: expected host/path")]
    InvalidUrl(String),

    #[error("Could not connect to {host}: {source}")]
    Connect {
        host: String,
        source: std::io::Error,
    },

    #[error("Response header exceeded {0} bytes without a terminator")]
    HeaderOverflow(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the skywave engine
pub type Result<T> = std::result::Result<T, RadioError>;
