//! FastDTW similarity
//!
//! Dynamic-time-warping distance between two value sequences, computed with
//! the FastDTW scheme: coarsen both inputs by half, solve recursively, then
//! refine the low-resolution warp path through a radius-inflated search
//! window at full resolution. Cost is the absolute value difference; the
//! similarity verdict compares the path-length-normalized distance against
//! a caller threshold.

use std::collections::HashMap;

/// A warp path through the cost matrix, from (0, 0) to (n-1, m-1)
pub type WarpPath = Vec<(usize, usize)>;

/// Inclusive per-row column bounds of the search window
type Window = Vec<(usize, usize)>;

fn reduce_by_half(x: &[f64]) -> Vec<f64> {
    x.chunks(2)
        .map(|c| c.iter().sum::<f64>() / c.len() as f64)
        .collect()
}

fn full_window(n: usize, m: usize) -> Window {
    vec![(0, m - 1); n]
}

/// Project a low-resolution warp path onto the full-resolution matrix and
/// inflate it by `radius` cells in both dimensions
fn expand_window(path: &WarpPath, n: usize, m: usize, radius: usize) -> Window {
    let mut lo = vec![usize::MAX; n];
    let mut hi = vec![0usize; n];

    for &(i, j) in path {
        let j_lo = (2 * j).min(m - 1);
        let j_hi = (2 * j + 1).min(m - 1);
        for row in [2 * i, 2 * i + 1] {
            if row < n {
                lo[row] = lo[row].min(j_lo);
                hi[row] = hi[row].max(j_hi);
            }
        }
    }
    // Odd-length tails can leave the final row unmarked
    for i in 0..n {
        if lo[i] == usize::MAX {
            lo[i] = if i > 0 { lo[i - 1] } else { 0 };
            hi[i] = if i > 0 { hi[i - 1] } else { 0 };
        }
    }

    let mut window = vec![(0usize, 0usize); n];
    for (i, slot) in window.iter_mut().enumerate() {
        let r_lo = i.saturating_sub(radius);
        let r_hi = (i + radius).min(n - 1);
        let mut j_lo = usize::MAX;
        let mut j_hi = 0usize;
        for r in r_lo..=r_hi {
            j_lo = j_lo.min(lo[r]);
            j_hi = j_hi.max(hi[r]);
        }
        *slot = (j_lo.saturating_sub(radius), (j_hi + radius).min(m - 1));
    }
    window[0].0 = 0;
    window[n - 1].1 = m - 1;
    window
}

/// DTW restricted to a search window; returns total cost and the warp path
fn dtw_windowed(a: &[f64], b: &[f64], window: &Window) -> (f64, WarpPath) {
    let n = a.len();
    let m = b.len();
    if n == 0 || m == 0 {
        return (f64::INFINITY, Vec::new());
    }

    let mut cost: HashMap<(usize, usize), f64> = HashMap::new();
    let mut parent: HashMap<(usize, usize), (usize, usize)> = HashMap::new();

    for i in 0..n {
        let (j_lo, j_hi) = window[i];
        for j in j_lo..=j_hi {
            let d = (a[i] - b[j]).abs();
            if i == 0 && j == 0 {
                cost.insert((0, 0), d);
                continue;
            }
            let mut best: Option<((usize, usize), f64)> = None;
            let neighbors = [
                (i.wrapping_sub(1), j),
                (i, j.wrapping_sub(1)),
                (i.wrapping_sub(1), j.wrapping_sub(1)),
            ];
            for nb in neighbors {
                if let Some(&c) = cost.get(&nb) {
                    if best.map_or(true, |(_, bc)| c < bc) {
                        best = Some((nb, c));
                    }
                }
            }
            // Cells with no reachable neighbor stay outside the matrix
            if let Some((nb, c)) = best {
                cost.insert((i, j), c + d);
                parent.insert((i, j), nb);
            }
        }
    }

    let end = (n - 1, m - 1);
    let Some(&total) = cost.get(&end) else {
        return (f64::INFINITY, Vec::new());
    };

    let mut path = vec![end];
    let mut cur = end;
    while let Some(&prev) = parent.get(&cur) {
        path.push(prev);
        cur = prev;
    }
    path.reverse();
    (total, path)
}

/// FastDTW: total warping cost and path
pub fn fast_dtw(a: &[f64], b: &[f64], radius: usize) -> (f64, WarpPath) {
    if a.is_empty() || b.is_empty() {
        return (f64::INFINITY, Vec::new());
    }
    let min_size = radius + 2;
    if a.len() <= min_size || b.len() <= min_size {
        return dtw_windowed(a, b, &full_window(a.len(), b.len()));
    }

    let (_, low_path) = fast_dtw(&reduce_by_half(a), &reduce_by_half(b), radius);
    if low_path.is_empty() {
        return dtw_windowed(a, b, &full_window(a.len(), b.len()));
    }
    let window = expand_window(&low_path, a.len(), b.len(), radius);
    dtw_windowed(a, b, &window)
}

/// Warping distance normalized by path length
pub fn normalized_distance(a: &[f64], b: &[f64], radius: usize) -> f64 {
    let (cost, path) = fast_dtw(a, b, radius);
    if path.is_empty() {
        return f64::INFINITY;
    }
    cost / path.len() as f64
}

/// True iff the normalized warping distance is within `threshold`
pub fn is_similar(a: &[f64], b: &[f64], radius: usize, threshold: f64) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    normalized_distance(a, b, radius) <= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(len: usize, phase: f64) -> Vec<f64> {
        (0..len)
            .map(|i| ((i as f64 * 0.2) + phase).sin() * 10.0)
            .collect()
    }

    #[test]
    fn test_identical_series_distance_zero() {
        let a = wave(64, 0.0);
        let (cost, path) = fast_dtw(&a, &a, 2);

        assert!(cost.abs() < 1e-9);
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(63, 63)));
        assert!(is_similar(&a, &a, 2, 0.0));
    }

    #[test]
    fn test_shifted_wave_is_similar() {
        let a = wave(64, 0.0);
        let b = wave(64, 0.4); // two samples of phase shift
        assert!(is_similar(&a, &b, 3, 1.0));
    }

    #[test]
    fn test_dissimilar_series() {
        let a = wave(64, 0.0);
        let b: Vec<f64> = (0..64).map(|i| i as f64 * 5.0).collect();
        assert!(!is_similar(&a, &b, 3, 1.0));
    }

    #[test]
    fn test_small_inputs_use_full_dtw() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0, 2.0, 3.0, 4.0];
        let (cost, path) = fast_dtw(&a, &b, 5);

        assert!((cost - 1.0).abs() < 1e-9); // final 3 vs 4
        assert_eq!(path.first(), Some(&(0, 0)));
        assert_eq!(path.last(), Some(&(2, 3)));
    }

    #[test]
    fn test_empty_input() {
        assert!(!is_similar(&[], &[1.0], 1, 100.0));
        let (cost, path) = fast_dtw(&[], &[1.0], 1);
        assert!(cost.is_infinite());
        assert!(path.is_empty());
    }

    #[test]
    fn test_fastdtw_close_to_exact() {
        let a = wave(128, 0.0);
        let b = wave(128, 0.6);
        let exact = dtw_windowed(&a, &b, &full_window(a.len(), b.len())).0;
        let fast = fast_dtw(&a, &b, 4).0;

        // FastDTW is an approximation but must not undercut the optimum
        assert!(fast >= exact - 1e-9);
        assert!(fast <= exact * 1.25 + 1.0);
    }
}
