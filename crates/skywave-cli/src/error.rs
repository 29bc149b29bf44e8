//! Error types for the skywave frontend
//!
//! Application-level errors that wrap engine errors and add store-specific
//! variants.

use skywave::error::RadioError;
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Engine(#[from] RadioError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Engine(RadioError::Io(e))
    }
}

/// Result type alias for the skywave frontend
pub type Result<T> = std::result::Result<T, AppError>;
