//! Boolean analyses: trend, outlier, frequency
//!
//! Each is a pure predicate over a materialized point array. Empty input is
//! `false` by definition, never an error.

use crate::analysis::aggregation::percentile;

/// True iff the least-squares slope over (t - t0, value) is strictly positive
pub fn trend(samples: &[(i64, f64)]) -> bool {
    let n = samples.len();
    if n < 2 {
        return false;
    }
    let t0 = samples[0].0;
    let nf = n as f64;
    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for &(t, v) in samples {
        let x = (t - t0) as f64;
        sx += x;
        sy += v;
        sxx += x * x;
        sxy += x * v;
    }
    let denom = nf * sxx - sx * sx;
    if denom.abs() < f64::EPSILON {
        return false;
    }
    let slope = (nf * sxy - sx * sy) / denom;
    slope > 0.0
}

/// Tukey box-plot outlier test
///
/// threshold = (q3 - q1) * 1.5 + q3 with type-7 quartiles; true iff some
/// value strictly exceeds the threshold. An all-equal series collapses to
/// threshold == value and never flags.
pub fn outlier(values: &[f64]) -> bool {
    if values.is_empty() {
        return false;
    }
    let q1 = percentile(values, 0.25);
    let q3 = percentile(values, 0.75);
    let threshold = (q3 - q1) * 1.5 + q3;
    values.iter().any(|&v| v > threshold)
}

/// Occurrence-delta frequency test
///
/// Buckets points into `window_minutes`-sized bins from the first timestamp
/// and flags when the point count of some bin exceeds its predecessor's by
/// more than `delta_threshold`.
pub fn frequency(samples: &[(i64, f64)], window_minutes: i64, delta_threshold: i64) -> bool {
    if samples.is_empty() || window_minutes <= 0 {
        return false;
    }
    let window_ms = window_minutes * 60_000;
    let t0 = samples[0].0;

    let last_bin = ((samples[samples.len() - 1].0 - t0) / window_ms) as usize;
    let mut counts = vec![0i64; last_bin + 1];
    for &(t, _) in samples {
        counts[((t - t0) / window_ms) as usize] += 1;
    }

    counts.windows(2).any(|w| w[1] - w[0] > delta_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_rising() {
        let samples: Vec<(i64, f64)> = (0..20).map(|i| (i * 1000, i as f64 * 0.5)).collect();
        assert!(trend(&samples));
    }

    #[test]
    fn test_trend_falling_and_flat() {
        let falling: Vec<(i64, f64)> = (0..20).map(|i| (i * 1000, 100.0 - i as f64)).collect();
        assert!(!trend(&falling));

        let flat: Vec<(i64, f64)> = (0..20).map(|i| (i * 1000, 4.0)).collect();
        assert!(!trend(&flat));

        assert!(!trend(&[]));
        assert!(!trend(&[(1000, 5.0)]));
    }

    #[test]
    fn test_outlier_spike() {
        let mut values: Vec<f64> = (0..50).map(|i| 10.0 + (i % 3) as f64).collect();
        values.push(500.0);
        assert!(outlier(&values));
    }

    #[test]
    fn test_outlier_all_equal_never_flags() {
        let values = vec![7.0; 100];
        assert!(!outlier(&values));
    }

    #[test]
    fn test_outlier_empty() {
        assert!(!outlier(&[]));
    }

    #[test]
    fn test_frequency_burst() {
        // One point per minute, then a burst of twelve in the sixth window
        let mut samples: Vec<(i64, f64)> = (0..5).map(|i| (i * 60_000, 1.0)).collect();
        for i in 0..12 {
            samples.push((5 * 60_000 + i * 1000, 1.0));
        }
        assert!(frequency(&samples, 1, 10));
        assert!(!frequency(&samples, 1, 20));
    }

    #[test]
    fn test_frequency_steady_rate() {
        let samples: Vec<(i64, f64)> = (0..60).map(|i| (i * 60_000, 1.0)).collect();
        assert!(!frequency(&samples, 5, 1));
    }

    #[test]
    fn test_frequency_empty_and_bad_window() {
        assert!(!frequency(&[], 1, 1));
        assert!(!frequency(&[(0, 1.0)], 0, 1));
    }
}
