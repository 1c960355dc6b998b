//! Codec error types
//!
//! Defines all errors that can occur while encoding or decoding chunks.

use thiserror::Error;

/// Errors that can occur in the chunk codec
#[derive(Error, Debug)]
pub enum CodecError {
    /// I/O operation failed while streaming bytes
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Compression or decompression failed (malformed chunk included)
    #[error("Compression error: {0}")]
    Compression(String),

    /// Invalid decode window (negative bounds, from > to)
    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

impl From<bincode::Error> for CodecError {
    fn from(err: bincode::Error) -> Self {
        CodecError::Serialization(err.to_string())
    }
}

/// Result type alias for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
