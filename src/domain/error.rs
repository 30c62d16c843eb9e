//! Domain error types

use thiserror::Error;

/// An argument fell outside its command's legal `[min, max)` range.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{name} must be in [{min}, {max}), got {value}")]
pub struct RangeError {
    pub name: &'static str,
    pub value: i64,
    pub min: i64,
    pub max: i64,
}

/// Errors that can occur while driving an IrMagician
#[derive(Error, Debug)]
pub enum IrmError {
    #[error("'{0}' is not supported.")]
    UnsupportedPlatform(String),

    #[error("Invalid argument: {0}")]
    OutOfRange(#[from] RangeError),

    #[error("Not connected: call connect() first")]
    NotConnected,

    #[error("Serial port error: {0}")]
    Serial(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for IrMagician operations
pub type IrmResult<T> = Result<T, IrmError>;
