//! Aggregation and analysis functions
//!
//! Stateless numeric functions over materialized point arrays, plus the
//! string-name dispatch the query layer drives them through:
//!
//! - **aggregation**: scalar functions (avg, dev, percentile, integral, ...)
//! - **detect**: boolean analyses (trend, outlier, frequency)
//! - **dtw**: FastDTW similarity
//! - **sax**: SAX symbolization and pattern matching
//! - **function**: the closed `Function` enum and argument parsing
//! - **error**: error types
//!
//! Data-shape degeneracies are results, not errors: an empty series
//! aggregates to NaN and analyzes to `false`. Errors are reserved for bad
//! arguments and unknown function names.

pub mod aggregation;
pub mod detect;
pub mod dtw;
pub mod error;
pub mod function;
pub mod sax;

// Re-export commonly used types
pub use error::{AnalysisError, AnalysisResult};
pub use function::Function;
