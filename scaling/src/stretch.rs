//! Display stretches applied after the colour interval.
//!
//! A stretch maps values already normalized to [0, 1] by the colour limits
//! onto [0, 1] display levels, bringing out faint or bright structure.
//! Every stretch has an inverse so display levels can be mapped back to data
//! values (for colour-bar labels and slider readouts).
//!
//! Stretches whose formula is undefined below zero (square root, powers,
//! logarithms) treat negative inputs as zero.

use crate::algo::interp::{check_table, interp_clamped, InterpError};
use crate::algo::stats::sort_values;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StretchError {
    #[error("Unrecognized stretch {name:?}. Please use one of {allowed:?}")]
    UnknownStretch {
        name: String,
        allowed: Vec<&'static str>,
    },

    #[error("Invalid {stretch} parameter: {reason}")]
    InvalidParameter {
        stretch: &'static str,
        reason: String,
    },

    #[error("Histogram equalization table: {0}")]
    Table(#[from] InterpError),
}

/// Stretch function from normalized values to display levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stretch", rename_all = "snake_case")]
pub enum Stretch {
    Linear {
        slope: f64,
        intercept: f64,
    },
    Sqrt,
    Squared,
    Power {
        a: f64,
    },
    PowerDist {
        a: f64,
    },
    Log {
        a: f64,
    },
    Asinh {
        a: f64,
    },
    Sinh {
        a: f64,
    },
    ContrastBias {
        contrast: f64,
        bias: f64,
    },
    /// Histogram equalization; the table is built from the data by [`Stretch::fitted`]
    HistEq {
        /// Sorted normalized values
        #[serde(skip)]
        table: Vec<f64>,
        /// Display level of each table entry
        #[serde(skip)]
        levels: Vec<f64>,
    },
}

impl Default for Stretch {
    fn default() -> Self {
        Stretch::linear()
    }
}

/// Largest histogram-equalization table kept after fitting.
pub const HISTEQ_TABLE_SIZE: usize = 4096;

const STRETCH_NAMES: [&str; 10] = [
    "linear",
    "sqrt",
    "squared",
    "power",
    "powerdist",
    "log",
    "asinh",
    "sinh",
    "contrastbias",
    "histeq",
];

impl Stretch {
    /// Identity stretch.
    pub fn linear() -> Self {
        Stretch::Linear {
            slope: 1.0,
            intercept: 0.0,
        }
    }

    /// Histogram equalization without a fitted table (identity until fitted).
    pub fn histeq() -> Self {
        Stretch::HistEq {
            table: Vec::new(),
            levels: Vec::new(),
        }
    }

    /// Construct a stretch by name with its default parameters.
    ///
    /// Matching follows the same rules as interval names: case-insensitive,
    /// separators ignored, any prefix of a known name.
    pub fn from_name(name: &str) -> Result<Self, StretchError> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        let unknown = || StretchError::UnknownStretch {
            name: name.to_string(),
            allowed: STRETCH_NAMES.to_vec(),
        };
        if key.is_empty() {
            return Err(unknown());
        }

        let matched = STRETCH_NAMES
            .iter()
            .find(|candidate| candidate.starts_with(key.as_str()))
            .ok_or_else(unknown)?;

        Ok(match *matched {
            "linear" => Stretch::linear(),
            "sqrt" => Stretch::Sqrt,
            "squared" => Stretch::Squared,
            "power" => Stretch::Power { a: 1.0 },
            "powerdist" => Stretch::PowerDist { a: 1000.0 },
            "log" => Stretch::Log { a: 1000.0 },
            "asinh" => Stretch::Asinh { a: 0.1 },
            "sinh" => Stretch::Sinh { a: 1.0 / 3.0 },
            "contrastbias" => Stretch::ContrastBias {
                contrast: 1.0,
                bias: 0.5,
            },
            _ => Stretch::histeq(),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stretch::Linear { .. } => "linear",
            Stretch::Sqrt => "sqrt",
            Stretch::Squared => "squared",
            Stretch::Power { .. } => "power",
            Stretch::PowerDist { .. } => "powerdist",
            Stretch::Log { .. } => "log",
            Stretch::Asinh { .. } => "asinh",
            Stretch::Sinh { .. } => "sinh",
            Stretch::ContrastBias { .. } => "contrastbias",
            Stretch::HistEq { .. } => "histeq",
        }
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), StretchError> {
        let invalid = |reason: String| {
            Err(StretchError::InvalidParameter {
                stretch: self.name(),
                reason,
            })
        };

        match *self {
            Stretch::Linear { slope, .. } if slope == 0.0 => {
                invalid("slope must be non-zero".to_string())
            }
            Stretch::Power { a } | Stretch::Log { a } | Stretch::Asinh { a } | Stretch::Sinh { a }
                if a <= 0.0 =>
            {
                invalid(format!("a must be positive, got {a}"))
            }
            Stretch::PowerDist { a } if a <= 0.0 || a == 1.0 => {
                invalid(format!("a must be positive and not 1, got {a}"))
            }
            Stretch::ContrastBias { contrast, .. } if contrast == 0.0 => {
                invalid("contrast must be non-zero".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Build the data-dependent part of the stretch from normalized values.
    ///
    /// Only histogram equalization uses the data; other stretches are
    /// returned unchanged. The equalization table is thinned to at most
    /// [`HISTEQ_TABLE_SIZE`] evenly spaced quantiles.
    pub fn fitted(self, normalized: &[f64]) -> Result<Self, StretchError> {
        match self {
            Stretch::HistEq { .. } => {
                let mut sorted: Vec<f64> =
                    normalized.iter().copied().filter(|v| v.is_finite()).collect();
                sort_values(&mut sorted);
                let table = thin_sorted(sorted, HISTEQ_TABLE_SIZE);
                let levels = equalized_levels(table.len());
                if !table.is_empty() {
                    check_table(&table, &levels)?;
                }
                Ok(Stretch::HistEq { table, levels })
            }
            other => Ok(other),
        }
    }

    /// Map a normalized value to a display level.
    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            Stretch::Linear { slope, intercept } => slope * x + intercept,
            Stretch::Sqrt => x.max(0.0).sqrt(),
            Stretch::Squared => x * x,
            Stretch::Power { a } => x.max(0.0).powf(a),
            Stretch::PowerDist { a } => (a.powf(x) - 1.0) / (a - 1.0),
            Stretch::Log { a } => (a * x.max(0.0) + 1.0).ln() / (a + 1.0).ln(),
            Stretch::Asinh { a } => (x / a).asinh() / (1.0 / a).asinh(),
            Stretch::Sinh { a } => (x / a).sinh() / (1.0 / a).sinh(),
            Stretch::ContrastBias { contrast, bias } => (x - bias) * contrast + 0.5,
            Stretch::HistEq {
                ref table,
                ref levels,
            } => {
                if table.is_empty() || table.len() != levels.len() {
                    return x;
                }
                interp_clamped(x, table, levels)
            }
        }
    }

    /// Map a display level back to a normalized value.
    pub fn inverse(&self, y: f64) -> f64 {
        match *self {
            Stretch::Linear { slope, intercept } => (y - intercept) / slope,
            Stretch::Sqrt => y * y,
            Stretch::Squared => y.max(0.0).sqrt(),
            Stretch::Power { a } => y.max(0.0).powf(1.0 / a),
            Stretch::PowerDist { a } => (y * (a - 1.0) + 1.0).ln() / a.ln(),
            Stretch::Log { a } => ((a + 1.0).powf(y) - 1.0) / a,
            Stretch::Asinh { a } => a * (y * (1.0 / a).asinh()).sinh(),
            Stretch::Sinh { a } => a * (y * (1.0 / a).sinh()).asinh(),
            Stretch::ContrastBias { contrast, bias } => (y - 0.5) / contrast + bias,
            Stretch::HistEq {
                ref table,
                ref levels,
            } => {
                if table.is_empty() || table.len() != levels.len() {
                    return y;
                }
                interp_clamped(y, levels, table)
            }
        }
    }
}

/// Evenly spaced levels over [0, 1] with `n` points.
fn equalized_levels(n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![0.0];
    }
    (0..n).map(|i| i as f64 / (n - 1) as f64).collect()
}

/// Keep at most `max_len` evenly spaced entries of `sorted`, first and last included.
fn thin_sorted(sorted: Vec<f64>, max_len: usize) -> Vec<f64> {
    let n = sorted.len();
    if n <= max_len || max_len < 2 {
        return sorted;
    }
    let step = (n - 1) as f64 / (max_len - 1) as f64;
    (0..max_len)
        .map(|i| sorted[((i as f64 * step).round() as usize).min(n - 1)])
        .collect()
}

impl FromStr for Stretch {
    type Err = StretchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stretch::from_name(s)
    }
}

impl fmt::Display for Stretch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn all_default_stretches() -> Vec<Stretch> {
        STRETCH_NAMES
            .iter()
            .filter(|name| **name != "histeq")
            .map(|name| Stretch::from_name(name).unwrap())
            .collect()
    }

    #[test]
    fn test_endpoints_fixed() {
        // Every stretch except contrast/bias maps 0 -> 0 and 1 -> 1
        for stretch in all_default_stretches() {
            if matches!(stretch, Stretch::ContrastBias { .. }) {
                continue;
            }
            assert_relative_eq!(stretch.apply(0.0), 0.0, epsilon = 1e-12);
            assert_relative_eq!(stretch.apply(1.0), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_inverse_recovers_input() {
        for stretch in all_default_stretches() {
            for x in [0.05, 0.3, 0.5, 0.9] {
                let y = stretch.apply(x);
                assert_relative_eq!(stretch.inverse(y), x, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_monotonic_on_unit_interval() {
        for stretch in all_default_stretches() {
            let levels: Vec<f64> = (0..=20).map(|i| stretch.apply(i as f64 / 20.0)).collect();
            assert!(
                levels.windows(2).all(|w| w[1] >= w[0]),
                "{stretch} is not monotonic"
            );
        }
    }

    #[test]
    fn test_known_values() {
        assert_relative_eq!(Stretch::Sqrt.apply(0.25), 0.5);
        assert_relative_eq!(Stretch::Squared.apply(0.5), 0.25);
        assert_relative_eq!(Stretch::Power { a: 3.0 }.apply(0.5), 0.125);
        let log = Stretch::Log { a: 1000.0 };
        assert_relative_eq!(log.apply(0.5), 501.0f64.ln() / 1001.0f64.ln());
        // Negative inputs are floored for stretches undefined below zero
        assert_eq!(Stretch::Sqrt.apply(-0.5), 0.0);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Stretch::from_name("LIN").unwrap(), Stretch::linear());
        assert_eq!(Stretch::from_name("si").unwrap(), Stretch::Sinh { a: 1.0 / 3.0 });
        assert_eq!(Stretch::from_name("power").unwrap(), Stretch::Power { a: 1.0 });
        assert_eq!(
            Stretch::from_name("power-dist").unwrap(),
            Stretch::PowerDist { a: 1000.0 }
        );
        assert!(matches!(
            Stretch::from_name("gamma"),
            Err(StretchError::UnknownStretch { .. })
        ));
    }

    #[test]
    fn test_validate_parameters() {
        assert!(Stretch::Log { a: 0.0 }.validate().is_err());
        assert!(Stretch::PowerDist { a: 1.0 }.validate().is_err());
        assert!(Stretch::ContrastBias {
            contrast: 0.0,
            bias: 0.5
        }
        .validate()
        .is_err());
        assert!(Stretch::Asinh { a: 0.1 }.validate().is_ok());
    }

    #[test]
    fn test_histeq_flattens_distribution() {
        // Heavily skewed values: most near zero, a few near one
        let mut normalized = vec![0.0, 0.01, 0.02, 0.03, 0.04, 0.05, 0.06, 0.07];
        normalized.push(1.0);
        let stretch = Stretch::from_name("histeq").unwrap().fitted(&normalized).unwrap();

        // The median input lands at the middle display level
        assert_relative_eq!(stretch.apply(0.04), 0.5);
        assert_relative_eq!(stretch.apply(1.0), 1.0);
        assert_relative_eq!(stretch.inverse(0.5), 0.04);
    }

    #[test]
    fn test_histeq_table_is_bounded() {
        let normalized: Vec<f64> = (0..100_000).map(|i| i as f64 / 99_999.0).collect();
        let stretch = Stretch::histeq().fitted(&normalized).unwrap();
        let Stretch::HistEq { table, levels } = &stretch else {
            panic!("expected histeq, got {stretch}");
        };
        assert_eq!(table.len(), HISTEQ_TABLE_SIZE);
        assert_eq!(levels.len(), HISTEQ_TABLE_SIZE);
        assert_eq!(table[0], 0.0);
        assert_eq!(table[HISTEQ_TABLE_SIZE - 1], 1.0);

        // a uniform ramp equalizes to itself
        assert_relative_eq!(stretch.apply(0.3), 0.3, epsilon = 1e-3);
        assert_relative_eq!(stretch.inverse(0.7), 0.7, epsilon = 1e-3);
    }

    #[test]
    fn test_histeq_without_data_is_identity() {
        let stretch = Stretch::histeq();
        assert_eq!(stretch.apply(0.3), 0.3);
        assert_eq!(stretch.inverse(0.3), 0.3);
    }
}
