//! Gzip wrapper for serialized chunks
//!
//! Generic byte-level compress/decompress applied over the delta-encoded
//! point buffer before it lands in a storage document. Standard streaming
//! gzip; malformed input surfaces as a `CodecError::Compression`, never a
//! panic.

use crate::codec::error::{CodecError, CodecResult};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Compress a byte buffer with gzip
pub fn compress(data: &[u8]) -> CodecResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| CodecError::Compression(format!("gzip write failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| CodecError::Compression(format!("gzip finish failed: {}", e)))
}

/// Decompress a gzip byte buffer
pub fn decompress(data: &[u8]) -> CodecResult<Vec<u8>> {
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| CodecError::Compression(format!("gzip decompression failed: {}", e)))?;
    Ok(out)
}
