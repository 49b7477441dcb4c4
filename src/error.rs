//! Error types for this crate.
//!
//! All fallible operations return [`Result<T>`] which uses [`DetectorError`] as the error type.

use thiserror::Error;

/// A [`Result`](std::result::Result) alias using [`DetectorError`] as the error type.
pub type Result<T> = std::result::Result<T, DetectorError>;

/// The unified error type for all crate errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DetectorError {
    /// Input text was empty or whitespace-only. No inference runs.
    #[error("input text is empty")]
    EmptyInput,

    /// Model files missing or unreadable. Fatal at startup.
    #[error("{0}")]
    ModelLoad(String),

    /// Tokenization failure. Check input text.
    #[error("{0}")]
    Tokenization(String),

    /// Device initialization failure. Fall back to CPU.
    #[error("{0}")]
    Device(String),

    /// Web server failure (bind, serve).
    #[error("{0}")]
    Server(String),

    /// Internal error. Report if seen.
    #[error("{0}")]
    Unexpected(String),
}

impl From<candle_core::Error> for DetectorError {
    fn from(value: candle_core::Error) -> Self {
        DetectorError::Unexpected(value.to_string())
    }
}

impl From<std::io::Error> for DetectorError {
    fn from(value: std::io::Error) -> Self {
        DetectorError::ModelLoad(value.to_string())
    }
}

impl From<serde_json::Error> for DetectorError {
    fn from(value: serde_json::Error) -> Self {
        DetectorError::ModelLoad(value.to_string())
    }
}
