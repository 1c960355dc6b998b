//! Chunk codec
//!
//! Turns ordered point streams into compressed storage documents and back:
//!
//! - **point**: delta point codec (offset-only-when-changed records)
//! - **compression**: gzip wrapper over the serialized record buffer
//! - **document**: the storage-document boundary with the search engine
//! - **error**: error types
//!
//! # Data flow
//!
//! ```text
//! Write path:  pairs → delta encode → gzip → StorageDocument
//! Read path:   StorageDocument → gunzip → delta decode (range-clipped) → TimeSeries
//! ```

pub mod compression;
pub mod document;
pub mod error;
pub mod point;

// Re-export commonly used types
pub use compression::{compress, decompress};
pub use document::{decode_document, decode_document_range, encode_document, StorageDocument};
pub use error::{CodecError, CodecResult};
pub use point::{decode, decode_range, encode, PointDecoder};
