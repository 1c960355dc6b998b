//! Analysis error types
//!
//! Argument and dispatch errors only: data-shape problems (empty series)
//! are never errors here, they yield NaN or `false` by design.

use thiserror::Error;

/// Errors that can occur while resolving or applying functions
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No function registered under this name
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// A positional argument failed to parse or is out of range
    #[error("Invalid argument for {function}: {message}")]
    InvalidArgument { function: String, message: String },

    /// Wrong number of positional arguments or input series
    #[error("{function} expects {expected} arguments, got {got}")]
    ArgumentCount {
        function: String,
        expected: usize,
        got: usize,
    },
}

impl AnalysisError {
    pub(crate) fn invalid(function: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            function: function.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for analysis operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;
