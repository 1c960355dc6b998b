//! Ordered-pair time series
//!
//! `TimeSeries` is the in-memory representation of one logical series:
//! a cleansed, strictly ascending sequence of `Pair`s plus a string-keyed
//! attribute map. Series are immutable after construction; every derived
//! form (sub-series, relocation, merge result) is a new instance.
//!
//! Cleansing at construction:
//! 1. pairs are sorted by timestamp (the sentinel sorts first)
//! 2. pairs sharing a timestamp collapse to the last one written
//! 3. runs of equal consecutive values collapse to the first occurrence
//! 4. the sentinel pair is always present at index 0, even for a logically
//!    empty series (which therefore has `len() == 1`)

use crate::series::error::{SeriesError, SeriesResult};
use crate::series::types::Pair;
use std::collections::HashMap;

/// Restartable iterator over a series' pairs
pub type SeriesIter<'a> = std::iter::Copied<std::slice::Iter<'a, Pair>>;

/// An immutable, cleansed, ordered series of (timestamp, value) pairs
#[derive(Debug, Clone)]
pub struct TimeSeries {
    /// Cleansed pairs, sentinel at index 0, strictly ascending afterwards
    points: Vec<Pair>,
    /// Arbitrary metadata: metric name, host, region, ...
    attributes: HashMap<String, String>,
}

impl TimeSeries {
    /// Build a series from raw pairs with no attributes
    pub fn new<I: IntoIterator<Item = Pair>>(pairs: I) -> Self {
        Self::from_pairs(pairs, HashMap::new())
    }

    /// Build a series from raw pairs plus an attribute map
    ///
    /// The input may be unsorted and may contain duplicate timestamps or
    /// repeated values; cleansing resolves both (see module docs). The
    /// cleanse is idempotent: rebuilding a series from its own iterator
    /// yields an equal series.
    pub fn from_pairs<I: IntoIterator<Item = Pair>>(
        pairs: I,
        attributes: HashMap<String, String>,
    ) -> Self {
        let mut raw: Vec<Pair> = pairs.into_iter().collect();
        // Stable sort; None (sentinel) times order first
        raw.sort_by_key(|p| p.time);

        // Pass 1: equal timestamps keep the last written pair
        let mut by_time: Vec<Pair> = Vec::with_capacity(raw.len());
        for p in raw {
            if let Some(last) = by_time.last_mut() {
                if last.time == p.time {
                    *last = p;
                    continue;
                }
            }
            by_time.push(p);
        }

        // Pass 2: runs of equal values keep the first occurrence,
        // with the sentinel always leading
        let mut points: Vec<Pair> = Vec::with_capacity(by_time.len() + 1);
        points.push(Pair::SENTINEL);
        for p in by_time {
            if p.time.is_none() {
                // Collapsed into the leading sentinel
                continue;
            }
            if let Some(last) = points.last() {
                if last.value == p.value {
                    continue;
                }
            }
            points.push(p);
        }

        Self { points, attributes }
    }

    /// Number of pairs including the leading sentinel
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True iff the series holds no real points (sentinel only)
    pub fn is_empty(&self) -> bool {
        self.points.len() <= 1
    }

    /// Pair at `index` (0 is the sentinel)
    pub fn get(&self, index: usize) -> Pair {
        self.points[index]
    }

    /// Fresh restartable iterator over all pairs, sentinel included
    pub fn iter(&self) -> SeriesIter<'_> {
        self.points.iter().copied()
    }

    /// Real (non-sentinel) points
    pub fn real_points(&self) -> &[Pair] {
        &self.points[1..]
    }

    /// Materialized values of the real points, in time order
    pub fn values(&self) -> Vec<f64> {
        self.points[1..].iter().filter_map(|p| p.value).collect()
    }

    /// Materialized (timestamp, value) tuples of the real points
    pub fn samples(&self) -> Vec<(i64, f64)> {
        self.points[1..]
            .iter()
            .filter_map(|p| Some((p.time?, p.value?)))
            .collect()
    }

    /// Timestamp of the first real point
    pub fn first_time(&self) -> Option<i64> {
        self.points.get(1).and_then(|p| p.time)
    }

    /// Timestamp of the last real point
    pub fn last_time(&self) -> Option<i64> {
        if self.is_empty() {
            return None;
        }
        self.points.last().and_then(|p| p.time)
    }

    /// Attribute map
    pub fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }

    /// Single attribute lookup
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Index of the step governing time `x`: the greatest index whose
    /// timestamp is <= x, or 0 (the sentinel) before the first real point
    pub(crate) fn step_index(&self, x: i64) -> usize {
        self.points[1..].partition_point(|p| p.time.is_some_and(|t| t <= x))
    }

    /// Step-function evaluation: the value of the most recent point at or
    /// before `x`, `None` before the first real point
    pub fn apply(&self, x: i64) -> Option<f64> {
        self.points[self.step_index(x)].value
    }

    /// Extract the sub-series valid on `[a, b)`
    ///
    /// Synthesizes boundary points at exactly `a` and `b` carrying the step
    /// values there, and keeps every interior point. Fails fast when
    /// `a >= b`.
    pub fn sub_series(&self, a: i64, b: i64) -> SeriesResult<TimeSeries> {
        if a >= b {
            return Err(SeriesError::InvalidRange(format!(
                "sub_series requires a < b, got a={} b={}",
                a, b
            )));
        }
        let lo = self.step_index(a);
        let hi = self.step_index(b);

        let mut pairs = Vec::with_capacity(hi.saturating_sub(lo) + 2);
        pairs.push(Pair {
            time: Some(a),
            value: self.points[lo].value,
        });
        for p in &self.points[lo + 1..=hi] {
            if let Some(t) = p.time {
                if t > a && t < b {
                    pairs.push(*p);
                }
            }
        }
        pairs.push(Pair {
            time: Some(b),
            value: self.points[hi].value,
        });

        Ok(TimeSeries::from_pairs(pairs, self.attributes.clone()))
    }

    /// True iff the series is constant on `[a, b)`
    ///
    /// Cheap step-index comparison; nothing is materialized. A value change
    /// exactly at `b` does not break the leg (the window is half-open).
    pub fn same_leg(&self, a: i64, b: i64) -> bool {
        let i = self.step_index(a);
        let j = self.step_index(b);
        i == j || (j == i + 1 && self.points[j].time == Some(b))
    }

    /// Shift the series so its first real point lands on `new_start`,
    /// preserving all inter-point gaps. A logically empty series relocates
    /// to itself.
    pub fn relocate(&self, new_start: i64) -> TimeSeries {
        let Some(first) = self.first_time() else {
            return self.clone();
        };
        let delta = new_start - first;
        let shifted = self.points[1..].iter().map(|p| Pair {
            time: p.time.map(|t| t + delta),
            value: p.value,
        });
        TimeSeries::from_pairs(shifted, self.attributes.clone())
    }
}

/// Two series are equal iff their pairwise weak-equality merge is the
/// constant `true` over the whole merged domain: same timestamps, same
/// values, no divergence points. Attributes are not compared.
impl PartialEq for TimeSeries {
    fn eq(&self, other: &Self) -> bool {
        let merged = crate::series::merge::MergeIter::new(vec![self.iter(), other.iter()]);
        // Merge emits one row per cursor advance; rows sharing a timestamp
        // collapse keep-last before the comparison is judged.
        let mut prev: Option<(Option<i64>, bool)> = None;
        for (time, values) in merged {
            let equal_here = values[0] == values[1];
            match prev {
                Some((t, _)) if t == time => prev = Some((t, equal_here)),
                Some((_, ok)) => {
                    if !ok {
                        return false;
                    }
                    prev = Some((time, equal_here));
                }
                None => prev = Some((time, equal_here)),
            }
        }
        prev.map_or(true, |(_, ok)| ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(pairs: &[(i64, f64)]) -> TimeSeries {
        TimeSeries::new(pairs.iter().map(|&(t, v)| Pair::new(t, v)))
    }

    #[test]
    fn test_sentinel_always_present() {
        let s = series(&[(1000, 1.0), (2000, 2.0)]);
        assert_eq!(s.len(), 3);
        assert!(s.get(0).is_sentinel());

        let empty = TimeSeries::new(std::iter::empty());
        assert_eq!(empty.len(), 1);
        assert!(empty.is_empty());
        assert!(empty.get(0).is_sentinel());
    }

    #[test]
    fn test_duplicate_timestamps_keep_last() {
        let s = TimeSeries::new(vec![
            Pair::new(1000, 1.0),
            Pair::new(1000, 2.0),
            Pair::new(2000, 3.0),
        ]);
        assert_eq!(s.get(1), Pair::new(1000, 2.0));
        assert_eq!(s.get(2), Pair::new(2000, 3.0));
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_equal_value_runs_keep_first() {
        let s = series(&[(1000, 5.0), (2000, 5.0), (3000, 5.0), (4000, 7.0)]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.get(1), Pair::new(1000, 5.0));
        assert_eq!(s.get(2), Pair::new(4000, 7.0));
    }

    #[test]
    fn test_unsorted_input() {
        let s = series(&[(3000, 3.0), (1000, 1.0), (2000, 2.0)]);
        let times: Vec<i64> = s.real_points().iter().filter_map(|p| p.time).collect();
        assert_eq!(times, vec![1000, 2000, 3000]);
    }

    #[test]
    fn test_cleanse_idempotent() {
        let s = TimeSeries::new(vec![
            Pair::new(1000, 5.0),
            Pair::new(1000, 6.0),
            Pair::new(2000, 6.0),
            Pair::new(3000, 7.0),
        ]);
        let rebuilt = TimeSeries::from_pairs(s.iter(), s.attributes().clone());
        assert_eq!(s, rebuilt);
        assert_eq!(s.len(), rebuilt.len());
    }

    #[test]
    fn test_iter_is_restartable() {
        let s = series(&[(1000, 1.0), (2000, 2.0)]);
        assert_eq!(s.iter().count(), 3);
        assert_eq!(s.iter().count(), 3);
    }

    #[test]
    fn test_apply_step_semantics() {
        let s = series(&[(1000, 1.0), (2000, 2.0), (3000, 3.0)]);

        assert_eq!(s.apply(500), None); // before first point
        assert_eq!(s.apply(1000), Some(1.0));
        assert_eq!(s.apply(1500), Some(1.0));
        assert_eq!(s.apply(2000), Some(2.0));
        assert_eq!(s.apply(2999), Some(2.0));
        assert_eq!(s.apply(9999), Some(3.0)); // after last point
    }

    #[test]
    fn test_sub_series_boundaries() {
        let s = series(&[(1000, 1.0), (2000, 2.0), (3000, 3.0), (4000, 4.0)]);
        let sub = s.sub_series(1500, 3500).unwrap();

        // Valid on [1500, 3500): same step values as the source
        assert_eq!(sub.apply(1500), Some(1.0));
        assert_eq!(sub.apply(2000), Some(2.0));
        assert_eq!(sub.apply(3000), Some(3.0));
        assert_eq!(sub.first_time(), Some(1500));
    }

    #[test]
    fn test_sub_series_invalid_range() {
        let s = series(&[(1000, 1.0)]);
        assert!(s.sub_series(2000, 2000).is_err());
        assert!(s.sub_series(3000, 2000).is_err());
    }

    #[test]
    fn test_same_leg() {
        let s = series(&[(1000, 1.0), (2000, 2.0), (3000, 3.0)]);

        assert!(s.same_leg(1000, 1999));
        assert!(s.same_leg(1000, 2000)); // change exactly at b is outside [a, b)
        assert!(!s.same_leg(1000, 2001));
        assert!(s.same_leg(100, 900)); // constant (undefined) before first point
        assert!(s.same_leg(5000, 9000)); // constant after last point
    }

    #[test]
    fn test_relocate() {
        let s = series(&[(1000, 1.0), (3000, 2.0)]);
        let moved = s.relocate(5000);
        assert_eq!(moved.first_time(), Some(5000));
        assert_eq!(moved.last_time(), Some(7000));
        assert_eq!(moved.apply(5000), Some(1.0));
    }

    #[test]
    fn test_equality() {
        let a = series(&[(1000, 1.0), (2000, 2.0)]);
        let b = series(&[(1000, 1.0), (2000, 2.0)]);
        let c = series(&[(1000, 1.0), (2000, 3.0)]);
        let d = series(&[(1000, 1.0), (2500, 2.0)]);

        assert_eq!(a, b);
        assert_ne!(a, c); // diverging value
        assert_ne!(a, d); // diverging timestamp
        assert_eq!(
            TimeSeries::new(std::iter::empty()),
            TimeSeries::new(std::iter::empty())
        );
    }
}
