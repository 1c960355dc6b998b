//! Compaction / resampling
//!
//! Resamples an ordered pair stream onto a caller-provided ascending sample
//! grid: values falling in `[s_i, s_{i+1})` are buffered and reduced into a
//! single output pair stamped `s_i`. Input strictly before the first sample
//! is dropped. Lazy single pass over both inputs.

use crate::series::types::Pair;
use std::iter::Peekable;

/// Lazy resampler over an ordered input and an ordered sample grid
///
/// The input is expected to run out before the sample grid does; any points
/// at or past the last consumed sample boundary fold into the final bucket
/// rather than being silently dropped.
pub struct Compactor<I, S, F>
where
    I: Iterator<Item = Pair>,
    S: Iterator<Item = i64>,
    F: Fn(&[f64]) -> f64,
{
    input: Peekable<I>,
    samples: Peekable<S>,
    reduce: F,
    /// Lower bound of the bucket currently being filled
    current_sample: Option<i64>,
    buffer: Vec<f64>,
    started: bool,
}

impl<I, S, F> Compactor<I, S, F>
where
    I: Iterator<Item = Pair>,
    S: Iterator<Item = i64>,
    F: Fn(&[f64]) -> f64,
{
    pub fn new(input: I, samples: S, reduce: F) -> Self {
        Self {
            input: input.peekable(),
            samples: samples.peekable(),
            reduce,
            current_sample: None,
            buffer: Vec::new(),
            started: false,
        }
    }

    fn start(&mut self) {
        self.started = true;
        self.current_sample = self.samples.next();
        if let Some(first) = self.current_sample {
            // Drop input strictly before the first sample; sentinels too
            while let Some(head) = self.input.peek() {
                match head.time {
                    Some(t) if t >= first => break,
                    _ => {
                        self.input.next();
                    }
                }
            }
        }
    }
}

impl<I, S, F> Iterator for Compactor<I, S, F>
where
    I: Iterator<Item = Pair>,
    S: Iterator<Item = i64>,
    F: Fn(&[f64]) -> f64,
{
    type Item = Pair;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.start();
        }
        let bucket_start = self.current_sample?;

        // The bucket closes at the next sample boundary; if the grid is
        // exhausted everything left belongs to this final bucket.
        let bucket_end = self.samples.peek().copied();

        loop {
            match self.input.peek() {
                Some(head) => {
                    let in_bucket = match (head.time, bucket_end) {
                        (Some(t), Some(end)) => t < end,
                        (Some(_), None) => true,
                        (None, _) => true, // stray sentinel, consume and skip
                    };
                    if in_bucket {
                        if let Some(p) = self.input.next() {
                            if let Some(v) = p.value {
                                self.buffer.push(v);
                            }
                        }
                    } else {
                        // Bucket complete: emit and move the grid forward
                        let value = (self.reduce)(&self.buffer);
                        self.buffer.clear();
                        self.current_sample = self.samples.next();
                        return Some(Pair::new(bucket_start, value));
                    }
                }
                None => {
                    // Input exhausted: flush whatever is buffered
                    if self.buffer.is_empty() {
                        self.current_sample = None;
                        return None;
                    }
                    let value = (self.reduce)(&self.buffer);
                    self.buffer.clear();
                    self.current_sample = None;
                    return Some(Pair::new(bucket_start, value));
                }
            }
        }
    }
}
