//! Error types for the scrubbing engine.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, ScrubError>;

/// Errors that can occur while scrubbing a stream.
///
/// Per-line problems (malformed JSON, masking that breaks JSON structure)
/// are never errors: they are routed or reverted and tallied. Only I/O on
/// the surrounding stream is fatal.
#[derive(Error, Debug)]
pub enum ScrubError {
    /// Reading the input or writing the output failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrubError {
    /// Whether the error came from the underlying stream.
    pub fn is_io(&self) -> bool {
        matches!(self, ScrubError::Io(_))
    }
}
