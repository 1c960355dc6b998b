//! Streaming k-way merge
//!
//! Merges N ordered pair sequences into one ordered lazy sequence of
//! (time, vector-of-current-values). At each step the cursor with the
//! minimum head timestamp advances (the sentinel's `None` time sorts
//! smallest, so fresh cursors surface their sentinel first); all other
//! slots carry their last seen value forward (step-function semantics).
//! Ties between cursors are broken arbitrarily; tied rows share a
//! timestamp and collapse keep-last downstream.
//!
//! Reducers and binary operators here are "weak": an absent operand acts
//! as identity, never as zero.

use crate::series::timeseries::{SeriesIter, TimeSeries};
use crate::series::types::Pair;
use std::collections::HashMap;
use std::iter::Peekable;

/// Lazy k-way merge over pair iterators
pub struct MergeIter<I: Iterator<Item = Pair>> {
    cursors: Vec<Peekable<I>>,
    current: Vec<Option<f64>>,
}

impl<I: Iterator<Item = Pair>> MergeIter<I> {
    /// Merge the given cursors; each must already be ordered in time
    pub fn new(inputs: Vec<I>) -> Self {
        let current = vec![None; inputs.len()];
        let cursors = inputs.into_iter().map(Iterator::peekable).collect();
        Self { cursors, current }
    }
}

impl<I: Iterator<Item = Pair>> Iterator for MergeIter<I> {
    type Item = (Option<i64>, Vec<Option<f64>>);

    fn next(&mut self) -> Option<Self::Item> {
        // Pick the non-exhausted cursor with the smallest head time;
        // Option<i64> ordering puts None (sentinel) first.
        let mut min_slot: Option<(usize, Option<i64>)> = None;
        for (slot, cursor) in self.cursors.iter_mut().enumerate() {
            if let Some(head) = cursor.peek() {
                match min_slot {
                    Some((_, t)) if t <= head.time => {}
                    _ => min_slot = Some((slot, head.time)),
                }
            }
        }
        let (slot, _) = min_slot?;
        let pair = self.cursors[slot].next()?;
        self.current[slot] = pair.value;
        Some((pair.time, self.current.clone()))
    }
}

/// Weak fold: minimum of the present values, `None` when all are absent
pub fn weak_min(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().reduce(f64::min)
}

/// Weak fold: maximum of the present values, `None` when all are absent
pub fn weak_max(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().reduce(f64::max)
}

/// Weak fold: sum of the present values, `None` when all are absent
pub fn weak_sum(values: &[Option<f64>]) -> Option<f64> {
    values.iter().flatten().copied().reduce(|a, b| a + b)
}

/// Weak fold: average of the present values, `None` when all are absent
pub fn weak_avg(values: &[Option<f64>]) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values.iter().flatten() {
        sum += v;
        n += 1;
    }
    (n > 0).then(|| sum / n as f64)
}

/// Weak less-than: 1.0 / 0.0 when both operands are present, `None` otherwise
pub fn weak_lt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(if a? < b? { 1.0 } else { 0.0 })
}

/// Weak equality: absent equals absent; mixed presence is unequal
pub fn weak_eq(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    let equal = match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => x == y,
        _ => false,
    };
    Some(if equal { 1.0 } else { 0.0 })
}

fn union_attributes(series: &[&TimeSeries]) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    for s in series {
        for (k, v) in s.attributes() {
            attrs.entry(k.clone()).or_insert_with(|| v.clone());
        }
    }
    attrs
}

impl TimeSeries {
    /// K-way merge into the raw (time, values-vector) stream
    ///
    /// The returned iterator borrows only the series themselves, so the
    /// slice may be a temporary.
    pub fn merge<'a>(series: &[&'a TimeSeries]) -> MergeIter<SeriesIter<'a>> {
        MergeIter::new(series.iter().map(|s| s.iter()).collect())
    }

    /// K-way merge reduced to a single series through a weak vector fold
    ///
    /// The reducer sees the full per-slot vector at every merge step; absent
    /// slots (no value yet) are identity, not zero. Attributes of the inputs
    /// are unioned, first writer wins.
    pub fn merge_reduce<F>(series: &[&TimeSeries], reduce: F) -> TimeSeries
    where
        F: Fn(&[Option<f64>]) -> Option<f64>,
    {
        let pairs = Self::merge(series).map(|(time, values)| Pair {
            time,
            value: reduce(&values),
        });
        TimeSeries::from_pairs(pairs, union_attributes(series))
    }

    /// Pairwise merge through a weak binary operator
    ///
    /// Applies `op` to the synchronized step-values of exactly two series at
    /// every distinct timestamp of either.
    pub fn merge_with<F>(a: &TimeSeries, b: &TimeSeries, op: F) -> TimeSeries
    where
        F: Fn(Option<f64>, Option<f64>) -> Option<f64>,
    {
        let pairs = Self::merge(&[a, b]).map(|(time, values)| Pair {
            time,
            value: op(values[0], values[1]),
        });
        TimeSeries::from_pairs(pairs, union_attributes(&[a, b]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(pairs: &[(i64, f64)]) -> TimeSeries {
        TimeSeries::new(pairs.iter().map(|&(t, v)| Pair::new(t, v)))
    }

    #[test]
    fn test_merge_identity() {
        let s = series(&[(1000, 1.0), (2000, 2.0), (3000, 3.0)]);
        let rows: Vec<_> = TimeSeries::merge(&[&s]).collect();

        // Sentinel row first, then each point wrapped in a singleton vector
        assert_eq!(rows[0], (None, vec![None]));
        assert_eq!(rows[1], (Some(1000), vec![Some(1.0)]));
        assert_eq!(rows[2], (Some(2000), vec![Some(2.0)]));
        assert_eq!(rows[3], (Some(3000), vec![Some(3.0)]));
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_merge_carries_values_forward() {
        let a = series(&[(1000, 1.0), (3000, 3.0)]);
        let b = series(&[(2000, 20.0)]);
        let rows: Vec<_> = TimeSeries::merge(&[&a, &b])
            .filter(|(t, _)| t.is_some())
            .collect();

        assert_eq!(rows[0], (Some(1000), vec![Some(1.0), None]));
        assert_eq!(rows[1], (Some(2000), vec![Some(1.0), Some(20.0)]));
        assert_eq!(rows[2], (Some(3000), vec![Some(3.0), Some(20.0)]));
    }

    #[test]
    fn test_merge_empty_inputs() {
        let empty = TimeSeries::new(std::iter::empty());
        let s = series(&[(1000, 1.0)]);
        let rows: Vec<_> = TimeSeries::merge(&[&empty, &s])
            .filter(|(t, _)| t.is_some())
            .collect();

        assert_eq!(rows, vec![(Some(1000), vec![None, Some(1.0)])]);

        let none: Vec<&TimeSeries> = vec![];
        assert_eq!(TimeSeries::merge(&none).count(), 0);
    }

    #[test]
    fn test_merge_reduce_weak_avg() {
        let a = series(&[(1000, 2.0), (2000, 4.0)]);
        let b = series(&[(2000, 8.0)]);
        let merged = TimeSeries::merge_reduce(&[&a, &b], weak_avg);

        // At t=1000 only `a` has a value: absent is identity, not zero
        assert_eq!(merged.apply(1000), Some(2.0));
        assert_eq!(merged.apply(2000), Some(6.0));
    }

    #[test]
    fn test_merge_reduce_min_max_sum() {
        let a = series(&[(1000, 2.0)]);
        let b = series(&[(1000, 8.0)]);

        assert_eq!(
            TimeSeries::merge_reduce(&[&a, &b], weak_min).apply(1000),
            Some(2.0)
        );
        assert_eq!(
            TimeSeries::merge_reduce(&[&a, &b], weak_max).apply(1000),
            Some(8.0)
        );
        assert_eq!(
            TimeSeries::merge_reduce(&[&a, &b], weak_sum).apply(1000),
            Some(10.0)
        );
    }

    #[test]
    fn test_merge_with_less_than() {
        let a = series(&[(1000, 1.0), (2000, 9.0)]);
        let b = series(&[(1000, 5.0), (2000, 5.0)]);
        let lt = TimeSeries::merge_with(&a, &b, weak_lt);

        assert_eq!(lt.apply(1000), Some(1.0));
        assert_eq!(lt.apply(2000), Some(0.0));
    }

    #[test]
    fn test_merge_outlives_slice_argument() {
        let a = series(&[(1000, 1.0), (2000, 9.0)]);
        let b = series(&[(1000, 5.0)]);

        // The slice is a temporary; the iterator must stay usable afterwards
        let merged = TimeSeries::merge(&[&a, &b]);
        let rows: Vec<_> = merged.filter(|(t, _)| t.is_some()).collect();
        assert_eq!(rows.len(), 2);

        let diff = TimeSeries::merge_with(&a, &b, |x, y| Some(x? - y?));
        assert_eq!(diff.apply(1000), Some(-4.0));
        assert_eq!(diff.apply(2000), Some(4.0));
    }

    #[test]
    fn test_weak_folds_all_absent() {
        let absent: Vec<Option<f64>> = vec![None, None];
        assert_eq!(weak_min(&absent), None);
        assert_eq!(weak_max(&absent), None);
        assert_eq!(weak_sum(&absent), None);
        assert_eq!(weak_avg(&absent), None);
    }

    #[test]
    fn test_merge_attribute_union() {
        let mut attrs_a = HashMap::new();
        attrs_a.insert("host".to_string(), "h1".to_string());
        let mut attrs_b = HashMap::new();
        attrs_b.insert("region".to_string(), "eu".to_string());

        let a = TimeSeries::from_pairs(vec![Pair::new(1000, 1.0)], attrs_a);
        let b = TimeSeries::from_pairs(vec![Pair::new(2000, 2.0)], attrs_b);
        let merged = TimeSeries::merge_reduce(&[&a, &b], weak_sum);

        assert_eq!(merged.attribute("host"), Some("h1"));
        assert_eq!(merged.attribute("region"), Some("eu"));
    }
}
