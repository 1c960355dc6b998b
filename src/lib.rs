//! # Seriate
//!
//! Time-series chunk codec and transformation library, built to sit under a
//! document search engine: one compressed, delta-encoded chunk of points per
//! stored document, and a set of lazy operators and analytics over the
//! decoded series.
//!
//! ## Features
//!
//! - **Compact chunks**: offset-only-when-changed delta encoding + gzip
//! - **Cleansed series**: strictly ordered pairs, deduped and run-collapsed
//! - **Streaming operators**: k-way merge, grid resampling, greedy
//!   piecewise-linear regression, all as lazy single-pass iterators
//! - **Analytics**: aggregations (avg..percentile, Simpson integral) and
//!   analyses (trend, outlier, frequency, FastDTW, SAX)
//!
//! ## Modules
//!
//! - [`codec`]: chunk encode/decode and the storage-document boundary
//! - [`series`]: the ordered-pair series model and streaming transforms
//! - [`analysis`]: aggregation/analysis function library and dispatch
//!
//! ## Quick Start
//!
//! ```rust
//! use seriate::codec::{decode_document_range, encode_document};
//! use seriate::series::{Pair, TimeRange, TimeSeries};
//! use seriate::analysis::Function;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Build a series from raw pairs
//!     let series = TimeSeries::new(
//!         (0..60i64).map(|i| Pair::new(i * 60_000, 20.0 + (i % 7) as f64)),
//!     );
//!
//!     // Write path: series -> compressed storage document
//!     let doc = encode_document(&series, "cpu.load-0")?;
//!
//!     // Read path: document -> series, clipped to a query window
//!     let window = TimeRange::new(10 * 60_000, 30 * 60_000)?;
//!     let clipped = decode_document_range(&doc, &window)?;
//!
//!     // Analyze
//!     let p95 = Function::parse("p", &["0.95"])?.eval_aggregation(&clipped)?;
//!     println!("p95 over the window: {}", p95);
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod codec;
pub mod series;

// Re-export top-level types for convenience
pub use codec::{
    compress, decode, decode_document, decode_document_range, decode_range, decompress, encode,
    encode_document, CodecError, CodecResult, PointDecoder, StorageDocument,
};

pub use series::{
    weak_avg, weak_eq, weak_lt, weak_max, weak_min, weak_sum, Compactor, MergeIter, Pair,
    Regression, Segment, SeriesError, SeriesResult, TimeRange, TimeSeries,
};

pub use analysis::{AnalysisError, AnalysisResult, Function};
