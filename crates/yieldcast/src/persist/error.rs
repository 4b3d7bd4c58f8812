//! Persistence errors.

use std::io;

/// Failure while reading an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// Underlying reader failed.
    #[error("failed to read artifact: {0}")]
    Io(#[from] io::Error),

    /// Input is not valid JSON or does not match the schema shape.
    #[error("malformed artifact json: {0}")]
    Json(#[from] serde_json::Error),

    /// Input parsed but describes an invalid model.
    #[error("invalid artifact: {0}")]
    Validation(String),
}

/// Failure while writing an artifact.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// Underlying writer failed.
    #[error("failed to write artifact: {0}")]
    Io(#[from] io::Error),

    /// Serialization failed.
    #[error("failed to serialize artifact: {0}")]
    Json(#[from] serde_json::Error),
}
