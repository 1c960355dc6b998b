//! Function dispatch
//!
//! The aggregation/analysis set is addressable by string name with a fixed
//! positional string-argument list (the query layer hands both through
//! verbatim). Resolution happens once, up front, into a closed `Function`
//! enum carrying typed arguments; evaluation never touches strings again.

use crate::analysis::aggregation;
use crate::analysis::detect;
use crate::analysis::dtw;
use crate::analysis::error::{AnalysisError, AnalysisResult};
use crate::analysis::sax;
use crate::series::timeseries::TimeSeries;
use regex::Regex;

/// A resolved aggregation or analysis function with its typed arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    Avg,
    Min,
    Max,
    Dev,
    Percentile(f64),
    Sum,
    Count,
    First,
    Last,
    Range,
    Diff,
    SDiff,
    Integral,
    Trend,
    Outlier,
    Frequency {
        window_minutes: i64,
        delta_threshold: i64,
    },
    FastDtw {
        radius: usize,
        threshold: f64,
    },
    Sax {
        pattern: String,
        paa_size: usize,
        alphabet_size: usize,
        flatness_threshold: f64,
    },
}

fn arity(function: &str, args: &[&str], expected: usize) -> AnalysisResult<()> {
    if args.len() != expected {
        return Err(AnalysisError::ArgumentCount {
            function: function.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn num<T: std::str::FromStr>(function: &str, arg: &str) -> AnalysisResult<T> {
    arg.parse()
        .map_err(|_| AnalysisError::invalid(function, format!("cannot parse '{}'", arg)))
}

impl Function {
    /// Resolve a function name and its positional string arguments
    pub fn parse(name: &str, args: &[&str]) -> AnalysisResult<Function> {
        let zero_arg = |f: Function| -> AnalysisResult<Function> {
            arity(name, args, 0)?;
            Ok(f)
        };
        match name {
            "avg" => zero_arg(Function::Avg),
            "min" => zero_arg(Function::Min),
            "max" => zero_arg(Function::Max),
            "dev" => zero_arg(Function::Dev),
            "sum" => zero_arg(Function::Sum),
            "count" => zero_arg(Function::Count),
            "first" => zero_arg(Function::First),
            "last" => zero_arg(Function::Last),
            "range" => zero_arg(Function::Range),
            "diff" => zero_arg(Function::Diff),
            "sdiff" => zero_arg(Function::SDiff),
            "integral" => zero_arg(Function::Integral),
            "trend" => zero_arg(Function::Trend),
            "outlier" => zero_arg(Function::Outlier),
            "p" => {
                arity(name, args, 1)?;
                let p: f64 = num(name, args[0])?;
                if !(0.0..=1.0).contains(&p) {
                    return Err(AnalysisError::invalid(
                        name,
                        format!("percentile must be in [0, 1], got {}", p),
                    ));
                }
                Ok(Function::Percentile(p))
            }
            "frequency" => {
                arity(name, args, 2)?;
                let window_minutes: i64 = num(name, args[0])?;
                if window_minutes <= 0 {
                    return Err(AnalysisError::invalid(name, "window must be positive"));
                }
                Ok(Function::Frequency {
                    window_minutes,
                    delta_threshold: num(name, args[1])?,
                })
            }
            "fastdtw" => {
                arity(name, args, 2)?;
                Ok(Function::FastDtw {
                    radius: num(name, args[0])?,
                    threshold: num(name, args[1])?,
                })
            }
            "sax" => {
                arity(name, args, 4)?;
                Regex::new(args[0])
                    .map_err(|e| AnalysisError::invalid(name, format!("bad pattern: {}", e)))?;
                let paa_size: usize = num(name, args[1])?;
                if paa_size == 0 {
                    return Err(AnalysisError::invalid(name, "paa size must be positive"));
                }
                let alphabet_size: usize = num(name, args[2])?;
                if !(2..=10).contains(&alphabet_size) {
                    return Err(AnalysisError::invalid(
                        name,
                        format!("alphabet size must be in 2..=10, got {}", alphabet_size),
                    ));
                }
                Ok(Function::Sax {
                    pattern: args[0].to_string(),
                    paa_size,
                    alphabet_size,
                    flatness_threshold: num(name, args[3])?,
                })
            }
            other => Err(AnalysisError::UnknownFunction(other.to_string())),
        }
    }

    /// The wire name this function resolves from
    pub fn name(&self) -> &'static str {
        match self {
            Function::Avg => "avg",
            Function::Min => "min",
            Function::Max => "max",
            Function::Dev => "dev",
            Function::Percentile(_) => "p",
            Function::Sum => "sum",
            Function::Count => "count",
            Function::First => "first",
            Function::Last => "last",
            Function::Range => "range",
            Function::Diff => "diff",
            Function::SDiff => "sdiff",
            Function::Integral => "integral",
            Function::Trend => "trend",
            Function::Outlier => "outlier",
            Function::Frequency { .. } => "frequency",
            Function::FastDtw { .. } => "fastdtw",
            Function::Sax { .. } => "sax",
        }
    }

    /// True for the boolean analyses, false for the scalar aggregations
    pub fn is_analysis(&self) -> bool {
        matches!(
            self,
            Function::Trend
                | Function::Outlier
                | Function::Frequency { .. }
                | Function::FastDtw { .. }
                | Function::Sax { .. }
        )
    }

    /// Apply a scalar aggregation; NaN for an empty series, an error only
    /// when called with an analysis variant
    pub fn eval_aggregation(&self, series: &TimeSeries) -> AnalysisResult<f64> {
        let values = series.values();
        match self {
            Function::Avg => Ok(aggregation::avg(&values)),
            Function::Min => Ok(aggregation::min(&values)),
            Function::Max => Ok(aggregation::max(&values)),
            Function::Dev => Ok(aggregation::dev(&values)),
            Function::Percentile(p) => Ok(aggregation::percentile(&values, *p)),
            Function::Sum => Ok(aggregation::sum(&values)),
            Function::Count => Ok(aggregation::count(&values)),
            Function::First => Ok(aggregation::first(&values)),
            Function::Last => Ok(aggregation::last(&values)),
            Function::Range => Ok(aggregation::range(&values)),
            Function::Diff => Ok(aggregation::diff(&values)),
            Function::SDiff => Ok(aggregation::sdiff(&values)),
            Function::Integral => Ok(aggregation::integral(&series.samples())),
            other => Err(AnalysisError::invalid(
                other.name(),
                "is an analysis, not an aggregation",
            )),
        }
    }

    /// Apply a boolean analysis to the input series
    ///
    /// All analyses read the first series; `fastdtw` additionally compares
    /// against the second and demands at least two inputs.
    pub fn eval_analysis(&self, series: &[&TimeSeries]) -> AnalysisResult<bool> {
        let subject = series.first().ok_or(AnalysisError::ArgumentCount {
            function: self.name().to_string(),
            expected: 1,
            got: 0,
        })?;
        match self {
            Function::Trend => Ok(detect::trend(&subject.samples())),
            Function::Outlier => Ok(detect::outlier(&subject.values())),
            Function::Frequency {
                window_minutes,
                delta_threshold,
            } => Ok(detect::frequency(
                &subject.samples(),
                *window_minutes,
                *delta_threshold,
            )),
            Function::FastDtw { radius, threshold } => {
                let other = series.get(1).ok_or(AnalysisError::ArgumentCount {
                    function: "fastdtw".to_string(),
                    expected: 2,
                    got: series.len(),
                })?;
                Ok(dtw::is_similar(
                    &subject.values(),
                    &other.values(),
                    *radius,
                    *threshold,
                ))
            }
            Function::Sax {
                pattern,
                paa_size,
                alphabet_size,
                flatness_threshold,
            } => sax::matches(
                &subject.values(),
                pattern,
                *paa_size,
                *alphabet_size,
                *flatness_threshold,
            ),
            other => Err(AnalysisError::invalid(
                other.name(),
                "is an aggregation, not an analysis",
            )),
        }
    }
}
