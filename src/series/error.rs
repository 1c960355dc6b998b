//! Series error types
//!
//! Defines all errors that can occur while constructing or slicing series.

use thiserror::Error;

/// Errors that can occur in the series layer
#[derive(Error, Debug)]
pub enum SeriesError {
    /// Invalid range arguments (start >= end, negative bounds)
    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

/// Result type alias for series operations
pub type SeriesResult<T> = Result<T, SeriesError>;
