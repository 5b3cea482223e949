//! Colour-limit estimation for image display.
//!
//! Given a [`Sample`], the estimator chooses a `(low, high)` pair of data
//! values that map to the ends of a display colour scale. Several strategies
//! are available through [`Method`]:
//!
//! - **MinMax**: full range of valid values
//! - **Percentile**: clip at a lower/upper percentile (default 0.25, 99.75)
//! - **SymmetricPercentile**: keep the central `percent` of the distribution
//! - **ZScale**: sky-background-aware fit, robust to stars and hot pixels
//! - **Manual**: caller-supplied bounds, missing ones filled from the data
//! - **Auto**: MinMax for integer data with a narrow range, ZScale otherwise
//!
//! Invalid entries (masked, NaN, infinite) never influence the result. An
//! empty sample yields [`Limits::FALLBACK`] together with a
//! [`DegenerateInput`] flag instead of an error, so a display can keep
//! refreshing without interruption.

pub mod zscale;

use crate::algo::stats::{min_max, percentile_sorted, sort_values};
use crate::sample::{Sample, SampleKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use zscale::{zscale_limits, ZScaleParams};

/// Integer data whose peak-to-peak range is below this uses min/max limits.
pub const AUTO_MINMAX_MAX_PTP: f64 = 1000.0;

/// Default percentile clip used by [`Method::Percentile`].
pub const DEFAULT_PERCENTILES: (f64, f64) = (0.25, 99.75);

/// Configuration errors raised when building or applying a method.
#[derive(Debug, Error, PartialEq)]
pub enum IntervalError {
    #[error("Unrecognized interval method {name:?}. Please use one of {allowed:?}")]
    UnknownMethod {
        name: String,
        allowed: Vec<&'static str>,
    },

    #[error("Invalid percentile range ({lower}, {upper}): percentiles must satisfy 0 <= lower <= upper <= 100")]
    InvalidPercentile { lower: f64, upper: f64 },

    #[error("Invalid interval parameter: {0}")]
    InvalidParameter(String),
}

/// Recoverable condition reported alongside fallback or zero-width limits.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum DegenerateInput {
    #[error("No valid values among {total} entries; using fallback limits")]
    Empty { total: usize },

    #[error("Zero-width colour interval at {value}")]
    Flat { value: f64 },
}

/// Ordered pair of display bounds with `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub low: f64,
    pub high: f64,
}

impl Limits {
    /// Limits substituted when a sample has no valid values.
    pub const FALLBACK: Limits = Limits {
        low: 0.0,
        high: 1.0,
    };

    /// Create limits, swapping the bounds if given in descending order.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn center(&self) -> f64 {
        0.5 * (self.low + self.high)
    }

    /// True when both bounds coincide.
    pub fn is_flat(&self) -> bool {
        self.low == self.high
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    pub fn as_tuple(&self) -> (f64, f64) {
        (self.low, self.high)
    }
}

impl From<(f64, f64)> for Limits {
    fn from((a, b): (f64, f64)) -> Self {
        Self::new(a, b)
    }
}

impl fmt::Display for Limits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.low, self.high)
    }
}

/// Statistical strategy used to derive colour limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Method {
    Manual {
        low: Option<f64>,
        high: Option<f64>,
    },
    MinMax,
    Percentile {
        lower: f64,
        upper: f64,
    },
    SymmetricPercentile {
        percent: f64,
    },
    #[serde(rename = "zscale")]
    ZScale(ZScaleParams),
    Auto,
}

impl Default for Method {
    fn default() -> Self {
        Method::Auto
    }
}

/// Names accepted by [`Method::from_name`], in matching order.
const METHOD_NAMES: [&str; 7] = [
    "manual",
    "minmax",
    "percentile",
    "symmetric",
    "zscale",
    "background",
    "auto",
];

impl Method {
    /// Percentile clip with the default (0.25, 99.75) bounds.
    pub fn percentile() -> Self {
        let (lower, upper) = DEFAULT_PERCENTILES;
        Method::Percentile { lower, upper }
    }

    /// ZScale with default parameters.
    pub fn zscale() -> Self {
        Method::ZScale(ZScaleParams::default())
    }

    /// Construct a method from its name using default parameters.
    ///
    /// Matching is case-insensitive, ignores `-`, `_` and spaces, and accepts
    /// any prefix of a known name (`"perc"`, `"z"`, `"min-max"`).
    pub fn from_name(name: &str) -> Result<Self, IntervalError> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        let unknown = || IntervalError::UnknownMethod {
            name: name.to_string(),
            allowed: METHOD_NAMES.to_vec(),
        };

        if key.is_empty() {
            return Err(unknown());
        }

        let matched = METHOD_NAMES
            .iter()
            .find(|candidate| candidate.starts_with(key.as_str()))
            .ok_or_else(unknown)?;

        Ok(match *matched {
            "manual" => Method::Manual {
                low: None,
                high: None,
            },
            "minmax" => Method::MinMax,
            "percentile" => Method::percentile(),
            "symmetric" => Method::SymmetricPercentile { percent: 99.5 },
            "zscale" | "background" => Method::zscale(),
            _ => Method::Auto,
        })
    }

    /// Canonical name of the method.
    pub fn name(&self) -> &'static str {
        match self {
            Method::Manual { .. } => "manual",
            Method::MinMax => "minmax",
            Method::Percentile { .. } => "percentile",
            Method::SymmetricPercentile { .. } => "symmetric",
            Method::ZScale(_) => "zscale",
            Method::Auto => "auto",
        }
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), IntervalError> {
        match *self {
            Method::Percentile { lower, upper } => {
                let in_range = |p: f64| (0.0..=100.0).contains(&p);
                if !(in_range(lower) && in_range(upper) && lower <= upper) {
                    return Err(IntervalError::InvalidPercentile { lower, upper });
                }
            }
            Method::SymmetricPercentile { percent } => {
                if !(percent > 0.0 && percent <= 100.0) {
                    return Err(IntervalError::InvalidParameter(format!(
                        "symmetric percentile must be in (0, 100], got {percent}"
                    )));
                }
            }
            Method::Manual { low, high } => {
                for bound in [low, high].into_iter().flatten() {
                    if !bound.is_finite() {
                        return Err(IntervalError::InvalidParameter(format!(
                            "manual bounds must be finite, got {bound}"
                        )));
                    }
                }
                if let (Some(low), Some(high)) = (low, high) {
                    if low > high {
                        return Err(IntervalError::InvalidParameter(format!(
                            "manual low {low} exceeds high {high}"
                        )));
                    }
                }
            }
            Method::ZScale(params) => {
                if params.n_samples == 0 {
                    return Err(IntervalError::InvalidParameter(
                        "zscale n_samples must be positive".to_string(),
                    ));
                }
                if !(0.0..=1.0).contains(&params.max_reject) {
                    return Err(IntervalError::InvalidParameter(format!(
                        "zscale max_reject must be in [0, 1], got {}",
                        params.max_reject
                    )));
                }
                if params.krej <= 0.0 || params.contrast < 0.0 {
                    return Err(IntervalError::InvalidParameter(
                        "zscale krej must be positive and contrast non-negative".to_string(),
                    ));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Replace [`Method::Auto`] with the concrete method it selects for `sample`.
    pub fn resolve(&self, sample: &Sample) -> Method {
        match self {
            Method::Auto => {
                let narrow_integer = sample.kind() == SampleKind::Integer
                    && sample
                        .peak_to_peak()
                        .is_some_and(|ptp| ptp < AUTO_MINMAX_MAX_PTP);
                if narrow_integer {
                    Method::MinMax
                } else {
                    Method::zscale()
                }
            }
            other => *other,
        }
    }

    /// Limits of already-filtered finite values; `None` when `values` is empty
    /// and the method needs data.
    fn limits_of(&self, values: &[f64]) -> Option<(f64, f64)> {
        match *self {
            Method::Manual {
                low: Some(low),
                high: Some(high),
            } => Some((low, high)),
            Method::Manual { low, high } => {
                let (min, max) = min_max(values)?;
                Some((low.unwrap_or(min), high.unwrap_or(max)))
            }
            Method::MinMax | Method::Auto => min_max(values),
            Method::Percentile { lower, upper } => {
                let mut sorted = values.to_vec();
                sort_values(&mut sorted);
                Some((
                    percentile_sorted(&sorted, lower)?,
                    percentile_sorted(&sorted, upper)?,
                ))
            }
            Method::SymmetricPercentile { percent } => {
                let lower = (100.0 - percent) / 2.0;
                Method::Percentile {
                    lower,
                    upper: 100.0 - lower,
                }
                .limits_of(values)
            }
            Method::ZScale(params) => zscale_limits(values, &params),
        }
    }
}

impl FromStr for Method {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::from_name(s)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Percentile { lower, upper } => write!(f, "percentile({lower}, {upper})"),
            Method::SymmetricPercentile { percent } => write!(f, "symmetric({percent})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Result of a limit estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub limits: Limits,
    /// Concrete method used after resolving [`Method::Auto`]
    pub method: Method,
    /// Set when the limits are a fallback or have zero width
    pub degenerate: Option<DegenerateInput>,
}

impl Estimate {
    pub fn is_degenerate(&self) -> bool {
        self.degenerate.is_some()
    }
}

/// Estimate display limits for `sample` using `method`.
///
/// Returns an error only for invalid method parameters. Degenerate input is
/// reported through [`Estimate::degenerate`] and logged as a warning.
pub fn estimate(sample: &Sample, method: &Method) -> Result<Estimate, IntervalError> {
    method.validate()?;
    let method = method.resolve(sample);
    let values = sample.valid_values();

    let Some((a, b)) = method.limits_of(&values) else {
        let (rows, cols) = sample.dim();
        let condition = DegenerateInput::Empty { total: rows * cols };
        log::warn!("{condition}: {}", Limits::FALLBACK);
        return Ok(Estimate {
            limits: Limits::FALLBACK,
            method,
            degenerate: Some(condition),
        });
    };

    let limits = Limits::new(a, b);
    let degenerate = limits.is_flat().then_some(DegenerateInput::Flat { value: limits.low });
    log::debug!("Auto clims from {method}: {limits}");

    Ok(Estimate {
        limits,
        method,
        degenerate,
    })
}

/// Estimate limits using a method given by name.
pub fn estimate_by_name(sample: &Sample, name: &str) -> Result<Estimate, IntervalError> {
    estimate(sample, &Method::from_name(name)?)
}
