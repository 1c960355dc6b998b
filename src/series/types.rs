//! Core data types for the seriate series layer
//!
//! - `Pair`: a single (timestamp, value) measurement, with optional fields so
//!   the leading sentinel ("no data before the first real point") is an
//!   explicit state instead of a magic null
//! - `TimeRange`: a half-open time interval for queries

use crate::series::error::{SeriesError, SeriesResult};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single time-series pair
///
/// Timestamps are Unix epoch milliseconds. A pair with both fields absent is
/// the sentinel that every constructed series carries at index 0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Pair {
    /// Unix timestamp in milliseconds, absent for the sentinel
    pub time: Option<i64>,
    /// Measured value, absent for the sentinel
    pub value: Option<f64>,
}

impl Pair {
    /// The leading sentinel: undefined before the first real sample
    pub const SENTINEL: Pair = Pair {
        time: None,
        value: None,
    };

    /// Create a real data pair
    pub fn new(time: i64, value: f64) -> Self {
        Self {
            time: Some(time),
            value: Some(value),
        }
    }

    /// True iff this is the sentinel pair
    pub fn is_sentinel(&self) -> bool {
        self.time.is_none()
    }

    /// True iff both timestamp and value are present
    pub fn is_point(&self) -> bool {
        self.time.is_some() && self.value.is_some()
    }
}

/// Time range for queries (half-open interval: [start, end))
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start timestamp (inclusive), in milliseconds
    pub start: i64,
    /// End timestamp (exclusive), in milliseconds
    pub end: i64,
}

impl TimeRange {
    /// Create a new time range, failing fast on start >= end
    pub fn new(start: i64, end: i64) -> SeriesResult<Self> {
        if start >= end {
            return Err(SeriesError::InvalidRange(format!(
                "start {} must be less than end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Create a time range, returning None if invalid
    pub fn try_new(start: i64, end: i64) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Range covering the last N hours, ending now
    pub fn last_hours(hours: i64) -> Self {
        let end = Utc::now().timestamp_millis();
        Self {
            start: end - Duration::hours(hours).num_milliseconds(),
            end,
        }
    }

    /// Range covering the last N days, ending now
    pub fn last_days(days: i64) -> Self {
        Self::last_hours(days * 24)
    }

    /// Range covering one UTC calendar day; None for an invalid date
    pub fn day(year: i32, month: u32, day: u32) -> Option<Self> {
        let midnight = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
        let start = Utc.from_utc_datetime(&midnight).timestamp_millis();
        Some(Self {
            start,
            end: start + Duration::days(1).num_milliseconds(),
        })
    }

    /// Check if a timestamp falls within this range
    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp < self.end
    }

    /// Check if this range overlaps with another
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Get the duration in milliseconds
    pub fn duration_millis(&self) -> i64 {
        self.end - self.start
    }

    /// Get intersection with another range, if any
    pub fn intersection(&self, other: &TimeRange) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        Self::try_new(start, end)
    }
}
