//! Ordered-pair series and streaming transformations
//!
//! This module provides the in-memory series model and the lazy operators
//! that work over it:
//!
//! - **types**: `Pair` (optional-field point, sentinel included) and `TimeRange`
//! - **timeseries**: `TimeSeries`, the cleansed ordered representation
//! - **merge**: k-way streaming merge with weak reducers/operators
//! - **compact**: resampling onto a caller-provided sample grid
//! - **regression**: greedy piecewise-linear segmentation
//! - **error**: error types
//!
//! # Pipeline
//!
//! ```text
//! decoded pairs → TimeSeries → {merge | compact | regression} → derived series
//! ```

pub mod compact;
pub mod error;
pub mod merge;
pub mod regression;
pub mod timeseries;
pub mod types;

// Re-export commonly used types
pub use compact::Compactor;
pub use error::{SeriesError, SeriesResult};
pub use merge::{weak_avg, weak_eq, weak_lt, weak_max, weak_min, weak_sum, MergeIter};
pub use regression::{Regression, Segment};
pub use timeseries::{SeriesIter, TimeSeries};
pub use types::{Pair, TimeRange};
