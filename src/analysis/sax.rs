//! SAX symbolization
//!
//! Symbolic Aggregate approXimation: z-normalize the values, reduce them to
//! `paa_size` frames (piecewise aggregate approximation), then map each
//! frame to a letter via the Gaussian equiprobable breakpoints for the
//! chosen alphabet size. The analysis matches the resulting word against a
//! caller-supplied regular expression.

use crate::analysis::error::{AnalysisError, AnalysisResult};
use regex::Regex;

/// Gaussian breakpoints for alphabet sizes 2..=10
const BREAKPOINTS: [&[f64]; 9] = [
    &[0.0],
    &[-0.43, 0.43],
    &[-0.67, 0.0, 0.67],
    &[-0.84, -0.25, 0.25, 0.84],
    &[-0.97, -0.43, 0.0, 0.43, 0.97],
    &[-1.07, -0.57, -0.18, 0.18, 0.57, 1.07],
    &[-1.15, -0.67, -0.32, 0.0, 0.32, 0.67, 1.15],
    &[-1.22, -0.76, -0.43, -0.14, 0.14, 0.43, 0.76, 1.22],
    &[-1.28, -0.84, -0.52, -0.25, 0.0, 0.25, 0.52, 0.84, 1.28],
];

fn breakpoints(alphabet_size: usize) -> AnalysisResult<&'static [f64]> {
    if !(2..=10).contains(&alphabet_size) {
        return Err(AnalysisError::invalid(
            "sax",
            format!("alphabet size must be in 2..=10, got {}", alphabet_size),
        ));
    }
    Ok(BREAKPOINTS[alphabet_size - 2])
}

/// Z-normalize; a series whose stddev is below `flatness_threshold` is
/// treated as flat and maps to all zeros (the middle symbol)
fn znorm(values: &[f64], flatness_threshold: f64) -> Vec<f64> {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let std = var.sqrt();
    if std < flatness_threshold {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - mean) / std).collect()
}

/// Piecewise aggregate approximation down to `frames` values
fn paa(values: &[f64], frames: usize) -> Vec<f64> {
    let n = values.len();
    if frames >= n {
        return values.to_vec();
    }
    (0..frames)
        .map(|f| {
            let lo = f * n / frames;
            let hi = ((f + 1) * n / frames).max(lo + 1);
            values[lo..hi].iter().sum::<f64>() / (hi - lo) as f64
        })
        .collect()
}

/// SAX word for the values: one letter per PAA frame, 'a' the lowest band
pub fn sax_word(
    values: &[f64],
    paa_size: usize,
    alphabet_size: usize,
    flatness_threshold: f64,
) -> AnalysisResult<String> {
    let cuts = breakpoints(alphabet_size)?;
    if paa_size == 0 {
        return Err(AnalysisError::invalid("sax", "paa size must be positive"));
    }
    if values.is_empty() {
        return Ok(String::new());
    }

    let normalized = znorm(values, flatness_threshold);
    let frames = paa(&normalized, paa_size);

    Ok(frames
        .iter()
        .map(|&v| {
            let band = cuts.iter().take_while(|&&c| v >= c).count();
            (b'a' + band as u8) as char
        })
        .collect())
}

/// True iff the series' SAX word matches the pattern
///
/// The pattern is a regular expression over the word's letters; an invalid
/// pattern is an argument error, an empty series is simply no match.
pub fn matches(
    values: &[f64],
    pattern: &str,
    paa_size: usize,
    alphabet_size: usize,
    flatness_threshold: f64,
) -> AnalysisResult<bool> {
    let re = Regex::new(pattern)
        .map_err(|e| AnalysisError::invalid("sax", format!("bad pattern: {}", e)))?;
    if values.is_empty() {
        return Ok(false);
    }
    let word = sax_word(values, paa_size, alphabet_size, flatness_threshold)?;
    Ok(re.is_match(&word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_shape() {
        // Rising ramp: lowest band first, highest band last
        let values: Vec<f64> = (0..32).map(|i| i as f64).collect();
        let word = sax_word(&values, 4, 4, 0.01).unwrap();

        assert_eq!(word.len(), 4);
        assert_eq!(word.chars().next(), Some('a'));
        assert_eq!(word.chars().last(), Some('d'));
        let sorted: Vec<char> = {
            let mut cs: Vec<char> = word.chars().collect();
            cs.sort_unstable();
            cs
        };
        assert_eq!(word.chars().collect::<Vec<char>>(), sorted);
    }

    #[test]
    fn test_flat_series_maps_to_middle() {
        let values = vec![5.0; 16];
        let word = sax_word(&values, 4, 3, 0.01).unwrap();
        // Normalized zeros land in the middle band of an odd alphabet
        assert_eq!(word, "bbbb");
    }

    #[test]
    fn test_pattern_match() {
        let values: Vec<f64> = (0..32).map(|i| i as f64).collect();

        assert!(matches(&values, "^a.*d$", 4, 4, 0.01).unwrap());
        assert!(!matches(&values, "^d", 4, 4, 0.01).unwrap());
    }

    #[test]
    fn test_invalid_arguments() {
        let values = [1.0, 2.0];
        assert!(matches(&values, "a(", 4, 4, 0.01).is_err()); // bad regex
        assert!(sax_word(&values, 0, 4, 0.01).is_err());
        assert!(sax_word(&values, 4, 1, 0.01).is_err());
        assert!(sax_word(&values, 4, 11, 0.01).is_err());
    }

    #[test]
    fn test_empty_series_no_match() {
        assert!(!matches(&[], "a*", 4, 4, 0.01).unwrap());
    }
}
