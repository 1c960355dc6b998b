//! Storage document boundary
//!
//! The codec's sole contract with persistence: one chunk of one logical
//! series per document. A document carries four required fields (id, start,
//! end, compressed data blob) plus the series' open attribute map; the
//! search-engine collaborator owns storage and retrieval of the documents
//! themselves.

use crate::codec::compression;
use crate::codec::error::CodecResult;
use crate::codec::point;
use crate::series::timeseries::TimeSeries;
use crate::series::types::TimeRange;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One stored chunk: a flat field map consumed and produced by the codec
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageDocument {
    /// Document id, assigned by the caller
    pub id: String,
    /// Timestamp of the first real point, 0 for an empty series
    pub start: i64,
    /// Timestamp of the last real point, 0 for an empty series
    pub end: i64,
    /// Gzip-wrapped delta-encoded point records
    #[serde(with = "blob")]
    pub data: Vec<u8>,
    /// Arbitrary user attributes: metric name, host, region, ...
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

/// Blobs travel base64-encoded in the JSON shape the search engine stores
mod blob {
    use serde::{Deserialize, Deserializer, Serializer};

    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    pub fn encode(data: &[u8]) -> String {
        let mut out = String::with_capacity(data.len().div_ceil(3) * 4);
        for chunk in data.chunks(3) {
            let b = [
                chunk[0],
                chunk.get(1).copied().unwrap_or(0),
                chunk.get(2).copied().unwrap_or(0),
            ];
            let n = (u32::from(b[0]) << 16) | (u32::from(b[1]) << 8) | u32::from(b[2]);
            out.push(ALPHABET[(n >> 18) as usize & 63] as char);
            out.push(ALPHABET[(n >> 12) as usize & 63] as char);
            out.push(if chunk.len() > 1 {
                ALPHABET[(n >> 6) as usize & 63] as char
            } else {
                '='
            });
            out.push(if chunk.len() > 2 {
                ALPHABET[n as usize & 63] as char
            } else {
                '='
            });
        }
        out
    }

    pub fn decode(s: &str) -> Result<Vec<u8>, String> {
        let mut out = Vec::with_capacity(s.len() / 4 * 3);
        let mut quad = [0u8; 4];
        let mut filled = 0;
        let mut pad = 0;
        for c in s.bytes() {
            let v = match c {
                b'A'..=b'Z' => c - b'A',
                b'a'..=b'z' => c - b'a' + 26,
                b'0'..=b'9' => c - b'0' + 52,
                b'+' => 62,
                b'/' => 63,
                b'=' => {
                    pad += 1;
                    0
                }
                _ => return Err(format!("invalid base64 byte {}", c)),
            };
            quad[filled] = v;
            filled += 1;
            if filled == 4 {
                let n = (u32::from(quad[0]) << 18)
                    | (u32::from(quad[1]) << 12)
                    | (u32::from(quad[2]) << 6)
                    | u32::from(quad[3]);
                out.push((n >> 16) as u8);
                if pad < 2 {
                    out.push((n >> 8) as u8);
                }
                if pad < 1 {
                    out.push(n as u8);
                }
                filled = 0;
            }
        }
        if filled != 0 {
            return Err("truncated base64 input".to_string());
        }
        Ok(out)
    }

    pub fn serialize<S: Serializer>(data: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(de)?;
        decode(&s).map_err(serde::de::Error::custom)
    }
}

impl StorageDocument {
    /// JSON shape handed to the search-engine collaborator
    pub fn to_json(&self) -> CodecResult<String> {
        serde_json::to_string(self)
            .map_err(|e| crate::codec::error::CodecError::Serialization(e.to_string()))
    }

    /// Rebuild from the collaborator's JSON shape
    pub fn from_json(json: &str) -> CodecResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::codec::error::CodecError::Serialization(e.to_string()))
    }
}

/// Encode one series into a storage document
///
/// A logically empty series (sentinel only) produces start = 0, end = 0 and a
/// trivial blob that decodes back to no points.
pub fn encode_document(series: &TimeSeries, id: &str) -> CodecResult<StorageDocument> {
    let start = series.first_time().unwrap_or(0);
    let end = series.last_time().unwrap_or(0);

    let encoded = point::encode(series.iter())?;
    let data = compression::compress(&encoded)?;

    debug!(
        id,
        start,
        end,
        points = series.len() - 1,
        blob_bytes = data.len(),
        "encoded chunk document"
    );

    Ok(StorageDocument {
        id: id.to_string(),
        start,
        end,
        data,
        attributes: series.attributes().clone(),
    })
}

/// Decode a full document back into a series
pub fn decode_document(doc: &StorageDocument) -> CodecResult<TimeSeries> {
    let raw = compression::decompress(&doc.data)?;
    let decoder = point::decode(&raw, doc.start, doc.end)?;
    let series = TimeSeries::from_pairs(decoder, doc.attributes.clone());

    debug!(id = %doc.id, points = series.len() - 1, "decoded chunk document");
    Ok(series)
}

/// Decode a document clipped to the query window `[range.start, range.end)`
pub fn decode_document_range(doc: &StorageDocument, range: &TimeRange) -> CodecResult<TimeSeries> {
    let raw = compression::decompress(&doc.data)?;
    let decoder = point::decode_range(&raw, doc.start, doc.end, range.start, range.end)?;
    Ok(TimeSeries::from_pairs(decoder, doc.attributes.clone()))
}
