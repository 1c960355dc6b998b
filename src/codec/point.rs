//! Delta point codec
//!
//! Serializes a run of (timestamp, value) pairs into a compact record list.
//! Most metrics arrive on a fixed collection interval, so the timestamp
//! offset between points rarely changes: a record carries its offset only
//! when it differs from the previous one by 1 ms or more ("almost equal"
//! offsets are treated as unchanged and implied). The common record is a
//! bare value.
//!
//! Decoding is a single forward pass reconstructing absolute timestamps by
//! accumulating offsets from the series start, optionally clipped to a
//! half-open query window. The decoder is lazy and consumable exactly once.

use crate::codec::error::{CodecError, CodecResult};
use crate::series::types::Pair;
use serde::{Deserialize, Serialize};

/// Offsets closer than this to the previous offset are carried forward
/// implicitly. Fixed; callers needing coarser jitter tolerance must
/// pre-round their timestamps.
const ALMOST_EQUAL_MS: i64 = 1;

/// One encoded point: a value, plus the timestamp offset when it changed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct EncodedRecord {
    /// Delta to the previous timestamp; absent when unchanged
    pub offset: Option<i64>,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct EncodedChunk {
    records: Vec<EncodedRecord>,
}

/// Delta-encode the pairs into the record list
///
/// Single pass; sentinel pairs and pairs missing either field are skipped.
pub(crate) fn encode_records<I: IntoIterator<Item = Pair>>(points: I) -> Vec<EncodedRecord> {
    let mut records = Vec::new();
    let mut previous_offset: i64 = 0;
    let mut previous_date: Option<i64> = None;

    for p in points {
        let (Some(t), Some(v)) = (p.time, p.value) else {
            continue;
        };
        // 0 for the first point; the document's start field carries the base
        let offset = match previous_date {
            Some(d) => t - d,
            None => 0,
        };
        if (offset - previous_offset).abs() < ALMOST_EQUAL_MS {
            records.push(EncodedRecord {
                offset: None,
                value: v,
            });
        } else {
            previous_offset = offset;
            records.push(EncodedRecord {
                offset: Some(offset),
                value: v,
            });
        }
        previous_date = Some(t);
    }
    records
}

/// Encode an ordered pair sequence into chunk bytes
pub fn encode<I: IntoIterator<Item = Pair>>(points: I) -> CodecResult<Vec<u8>> {
    let chunk = EncodedChunk {
        records: encode_records(points),
    };
    Ok(bincode::serialize(&chunk)?)
}

/// Lazy decoder over one chunk
///
/// Single forward pass, consumable once; dropping it early is safe. Produced
/// by [`decode`] and [`decode_range`].
pub struct PointDecoder {
    records: Vec<EncodedRecord>,
    idx: usize,
    last_offset: i64,
    last_date: i64,
    series_end: i64,
    /// Half-open [from, to) clip, unranged when absent
    window: Option<(i64, i64)>,
}

impl Iterator for PointDecoder {
    type Item = Pair;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rec = self.records.get(self.idx)?;
            self.idx += 1;

            if let Some(o) = rec.offset {
                self.last_offset = o;
            }
            self.last_date += self.last_offset;
            let t = self.last_date;

            if t > self.series_end {
                self.idx = self.records.len();
                return None;
            }
            if let Some((from, to)) = self.window {
                if t < from {
                    continue;
                }
                if t >= to {
                    self.idx = self.records.len();
                    return None;
                }
            }
            return Some(Pair::new(t, rec.value));
        }
    }
}

fn parse_chunk(data: &[u8]) -> CodecResult<Vec<EncodedRecord>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let chunk: EncodedChunk = bincode::deserialize(data)?;
    Ok(chunk.records)
}

/// Decode everything between the series bounds
pub fn decode(data: &[u8], series_start: i64, series_end: i64) -> CodecResult<PointDecoder> {
    Ok(PointDecoder {
        records: parse_chunk(data)?,
        idx: 0,
        last_offset: 0,
        last_date: series_start,
        series_end,
        window: None,
    })
}

/// Decode clipped to the half-open window `[from, to)`
///
/// Fails fast on negative bounds or `from > to`. A window entirely outside
/// the series bounds is not an error: the decoder simply yields nothing.
pub fn decode_range(
    data: &[u8],
    series_start: i64,
    series_end: i64,
    from: i64,
    to: i64,
) -> CodecResult<PointDecoder> {
    if from < 0 || to < 0 {
        return Err(CodecError::InvalidRange(format!(
            "window bounds must be non-negative, got from={} to={}",
            from, to
        )));
    }
    if from > to {
        return Err(CodecError::InvalidRange(format!(
            "window from {} exceeds to {}",
            from, to
        )));
    }

    let mut decoder = decode(data, series_start, series_end)?;
    if to < series_start || from > series_end {
        // Window and series do not intersect: nothing to decode
        decoder.idx = decoder.records.len();
    }
    decoder.window = Some((from, to));
    Ok(decoder)
}
