//! Scalar aggregations
//!
//! Pure functions from materialized point arrays to a single number. Empty
//! input always yields NaN, never an error; callers check for NaN.

/// Arithmetic mean
pub fn avg(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    sum(values) / values.len() as f64
}

/// Minimum value
pub fn min(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NAN, f64::min)
}

/// Maximum value
pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NAN, f64::max)
}

/// Sum of values
pub fn sum(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum()
}

/// Number of points
pub fn count(values: &[f64]) -> f64 {
    values.len() as f64
}

/// First value in time order
pub fn first(values: &[f64]) -> f64 {
    values.first().copied().unwrap_or(f64::NAN)
}

/// Last value in time order
pub fn last(values: &[f64]) -> f64 {
    values.last().copied().unwrap_or(f64::NAN)
}

/// Max minus min
pub fn range(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    max(values) - min(values)
}

/// Absolute difference between first and last value
pub fn diff(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    (last(values) - first(values)).abs()
}

/// Signed difference between last and first value
pub fn sdiff(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    last(values) - first(values)
}

/// Sample standard deviation (n - 1 denominator); 0 for a single point
pub fn dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return 0.0;
    }
    let mean = avg(values);
    let ss: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Type-7 quantile: h = (n - 1) * p + 1 over the sorted values, linear
/// interpolation between floor(h) and floor(h) + 1. A `p` outside [0, 1]
/// yields NaN.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    let n = values.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let h = (n - 1) as f64 * p + 1.0;
    let base = h.floor() as usize; // 1-based rank
    let frac = h - h.floor();
    if base >= n {
        return sorted[n - 1];
    }
    sorted[base - 1] + frac * (sorted[base] - sorted[base - 1])
}

/// Integral over the point grid via composite Simpson's rule
///
/// Consecutive point triples use the uneven-spacing Simpson formula; a
/// leftover final interval falls back to a trapezoid. The x axis is raw
/// timestamps, so the result is in value-milliseconds.
pub fn integral(samples: &[(i64, f64)]) -> f64 {
    let n = samples.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return 0.0;
    }

    let mut total = 0.0;
    let mut i = 0;
    while i + 2 < n {
        let (x0, y0) = samples[i];
        let (x1, y1) = samples[i + 1];
        let (x2, y2) = samples[i + 2];
        let h0 = (x1 - x0) as f64;
        let h1 = (x2 - x1) as f64;
        if h0 <= 0.0 || h1 <= 0.0 {
            break;
        }
        total += ((h0 + h1) / 6.0)
            * (y0 * (2.0 - h1 / h0)
                + y1 * ((h0 + h1) * (h0 + h1) / (h0 * h1))
                + y2 * (2.0 - h0 / h1));
        i += 2;
    }
    if i + 1 == n - 1 {
        // Odd interval left over: trapezoid
        let (x0, y0) = samples[i];
        let (x1, y1) = samples[i + 1];
        total += (x1 - x0) as f64 * (y0 + y1) / 2.0;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_aggregations() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];

        assert_eq!(avg(&values), 3.0);
        assert_eq!(min(&values), 1.0);
        assert_eq!(max(&values), 5.0);
        assert_eq!(sum(&values), 15.0);
        assert_eq!(count(&values), 5.0);
        assert_eq!(first(&values), 1.0);
        assert_eq!(last(&values), 5.0);
        assert_eq!(range(&values), 4.0);
    }

    #[test]
    fn test_diff_and_sdiff() {
        let falling = [9.0, 5.0, 2.0];
        assert_eq!(diff(&falling), 7.0);
        assert_eq!(sdiff(&falling), -7.0);

        let rising = [2.0, 5.0, 9.0];
        assert_eq!(diff(&rising), 7.0);
        assert_eq!(sdiff(&rising), 7.0);
    }

    #[test]
    fn test_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // Sample stddev of the classic example
        assert!((dev(&values) - 2.138089935).abs() < 1e-6);

        assert_eq!(dev(&[42.0]), 0.0);
        assert!(dev(&[]).is_nan());
    }

    #[test]
    fn test_percentile_type7() {
        let values = [1.0, 2.0, 2.0, 3.0, 3.0, 3.0, 4.0, 5.0, 6.0];
        // h = (9 - 1) * 0.25 + 1 = 3 exactly, so the third sorted value
        assert_eq!(percentile(&values, 0.25), 2.0);

        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 1.0), 6.0);
        assert_eq!(percentile(&[1.0, 2.0], 0.5), 1.5);
    }

    #[test]
    fn test_percentile_unsorted_input() {
        let values = [6.0, 1.0, 3.0, 2.0, 5.0, 4.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 1.0), 6.0);
    }

    #[test]
    fn test_percentile_out_of_range_p() {
        let values = [1.0, 2.0, 3.0];
        assert!(percentile(&values, -0.5).is_nan());
        assert!(percentile(&values, 1.5).is_nan());
        assert!(percentile(&values, f64::NAN).is_nan());
    }

    #[test]
    fn test_integral_constant() {
        // y = 2 over 10 seconds: 2 * 10000 ms
        let samples: Vec<(i64, f64)> = (0..=10).map(|i| (i * 1000, 2.0)).collect();
        assert!((integral(&samples) - 20_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_integral_quadratic_is_exact() {
        // Simpson is exact for polynomials up to cubic: integral of t^2 on [0, 4]
        let samples: Vec<(i64, f64)> = (0..=4).map(|i| (i, (i * i) as f64)).collect();
        assert!((integral(&samples) - 64.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_integral_trapezoid_tail() {
        // Four points leave one interval for the trapezoid fallback
        let samples = [(0, 1.0), (1, 1.0), (2, 1.0), (3, 1.0)];
        assert!((integral(&samples) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_inputs_yield_nan() {
        let empty: [f64; 0] = [];
        assert!(avg(&empty).is_nan());
        assert!(min(&empty).is_nan());
        assert!(max(&empty).is_nan());
        assert!(sum(&empty).is_nan());
        assert!(first(&empty).is_nan());
        assert!(last(&empty).is_nan());
        assert!(range(&empty).is_nan());
        assert!(diff(&empty).is_nan());
        assert!(sdiff(&empty).is_nan());
        assert!(percentile(&empty, 0.5).is_nan());
        assert!(integral(&[]).is_nan());
        assert_eq!(count(&empty), 0.0);
    }
}
