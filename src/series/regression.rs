//! Greedy piecewise-linear regression
//!
//! Streams an ordered (x, y) sequence into linear segments. A running
//! simple-linear-regression accumulator grows the current segment point by
//! point; the first point whose inclusion pushes the mean-square-error to or
//! past epsilon closes the segment (with the fit from *before* that point)
//! and seeds the next one. Greedy and online: the boundaries depend on
//! arrival order, which is intended: this is a changepoint detector, not an
//! optimal segmentation.

/// One fitted linear segment, valid from `start_x` until the next segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Absolute x where the segment starts
    pub start_x: f64,
    /// Intercept of the fit, relative to `start_x`
    pub intercept: f64,
    /// Slope of the fit
    pub slope: f64,
}

/// Running simple-linear-regression sums over segment-local x
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    start_x: f64,
    n: f64,
    sx: f64,
    sy: f64,
    sxx: f64,
    sxy: f64,
    syy: f64,
    intercept: f64,
    slope: f64,
}

impl Accumulator {
    /// Seed a segment at absolute `start_x` with its first y (local x = 0)
    fn seed(start_x: f64, y: f64) -> Self {
        Self {
            start_x,
            n: 1.0,
            sx: 0.0,
            sy: y,
            sxx: 0.0,
            sxy: 0.0,
            syy: y * y,
            intercept: y,
            slope: 0.0,
        }
    }

    /// Mean-square-error after hypothetically adding (x_rel, y)
    fn mse_with(&self, x: f64, y: f64) -> f64 {
        let mut t = *self;
        t.add(x, y);
        let sse = t.syy - t.intercept * t.sy - t.slope * t.sxy;
        (sse / t.n).max(0.0)
    }

    /// Commit (x_rel, y) and refresh the fitted line
    fn add(&mut self, x: f64, y: f64) {
        self.n += 1.0;
        self.sx += x;
        self.sy += y;
        self.sxx += x * x;
        self.sxy += x * y;
        self.syy += y * y;

        let denom = self.n * self.sxx - self.sx * self.sx;
        if denom.abs() > f64::EPSILON {
            self.slope = (self.n * self.sxy - self.sx * self.sy) / denom;
        } else {
            self.slope = 0.0;
        }
        self.intercept = (self.sy - self.slope * self.sx) / self.n;
    }

    fn segment(&self) -> Segment {
        Segment {
            start_x: self.start_x,
            intercept: self.intercept,
            slope: self.slope,
        }
    }
}

/// Lazy greedy segmentation over an ordered (x, y) stream
pub struct Regression<I: Iterator<Item = (f64, f64)>> {
    input: I,
    epsilon: f64,
    acc: Option<Accumulator>,
}

impl<I: Iterator<Item = (f64, f64)>> Regression<I> {
    /// Segment `input` with the given mean-square-error bound
    pub fn new(input: I, epsilon: f64) -> Self {
        Self {
            input,
            epsilon,
            acc: None,
        }
    }
}

impl<I: Iterator<Item = (f64, f64)>> Iterator for Regression<I> {
    type Item = Segment;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some((x, y)) = self.input.next() else {
                // Input exhausted: flush the final open segment once
                return self.acc.take().map(|acc| acc.segment());
            };

            let Some(acc) = self.acc.as_mut() else {
                self.acc = Some(Accumulator::seed(x, y));
                continue;
            };

            let x_rel = x - acc.start_x;
            if acc.mse_with(x_rel, y) >= self.epsilon {
                // Close the segment with the fit from before this point,
                // then restart at the rejected point
                let closed = acc.segment();
                self.acc = Some(Accumulator::seed(x, y));
                return Some(closed);
            }
            acc.add(x_rel, y);
        }
    }
}
