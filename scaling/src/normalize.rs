//! Image normalization: colour interval followed by a stretch.
//!
//! Data values are first mapped linearly so that the colour limits land on
//! 0 and 1, optionally clipped to that range, then passed through a
//! [`Stretch`]. Masked and non-finite entries become NaN ("bad" pixels)
//! rather than being filled with a limit value, so they never distort the
//! colour distribution.

use crate::interval::{estimate, Estimate, IntervalError, Limits, Method};
use crate::sample::Sample;
use crate::stretch::{Stretch, StretchError};
use ndarray::Array2;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error(transparent)]
    Interval(#[from] IntervalError),

    #[error(transparent)]
    Stretch(#[from] StretchError),
}

/// Maps data values to display levels in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageNormalize {
    limits: Limits,
    stretch: Stretch,
    clip: bool,
}

impl ImageNormalize {
    /// Create a normalizer with fixed limits.
    pub fn new(limits: Limits, stretch: Stretch, clip: bool) -> Result<Self, NormalizeError> {
        stretch.validate()?;
        Ok(Self {
            limits,
            stretch,
            clip,
        })
    }

    /// Estimate limits from `sample` with `method` and fit the stretch to the data.
    ///
    /// The returned [`Estimate`] carries any degenerate-input condition so the
    /// caller can report it.
    pub fn from_sample(
        sample: &Sample,
        method: &Method,
        stretch: Stretch,
        clip: bool,
    ) -> Result<(Self, Estimate), NormalizeError> {
        stretch.validate()?;
        let estimate = estimate(sample, method)?;
        let mut norm = Self::new(estimate.limits, Stretch::linear(), clip)?;

        let normalized: Vec<f64> = sample
            .valid_values()
            .into_iter()
            .map(|v| norm.scale(v))
            .collect();
        norm.stretch = stretch.fitted(&normalized)?;

        Ok((norm, estimate))
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Replace the colour limits, keeping the stretch.
    pub fn set_limits(&mut self, limits: Limits) {
        self.limits = limits;
    }

    pub fn stretch(&self) -> &Stretch {
        &self.stretch
    }

    pub fn clip(&self) -> bool {
        self.clip
    }

    /// Linear position of `value` relative to the limits (0 at low, 1 at high).
    ///
    /// Zero-width limits map every finite value to 0.
    pub fn scale(&self, value: f64) -> f64 {
        if value.is_nan() {
            return f64::NAN;
        }
        let width = self.limits.width();
        if width == 0.0 {
            return 0.0;
        }
        (value - self.limits.low) / width
    }

    /// Display level of a data value; NaN for NaN input.
    pub fn apply(&self, value: f64) -> f64 {
        let mut x = self.scale(value);
        if x.is_nan() {
            return x;
        }
        if self.clip {
            x = x.clamp(0.0, 1.0);
        }
        let level = self.stretch.apply(x);
        if self.clip {
            level.clamp(0.0, 1.0)
        } else {
            level
        }
    }

    /// Data value that produces the display level `level`.
    pub fn inverse(&self, level: f64) -> f64 {
        self.limits.low + self.stretch.inverse(level) * self.limits.width()
    }

    /// Display levels for every entry of `sample`; masked and non-finite
    /// entries become NaN.
    pub fn normalize_sample(&self, sample: &Sample) -> Array2<f64> {
        let mut levels = sample
            .data()
            .mapv(|v| if v.is_finite() { self.apply(v) } else { f64::NAN });
        if let Some(mask) = sample.mask() {
            levels.zip_mut_with(mask, |level, &masked| {
                if masked {
                    *level = f64::NAN;
                }
            });
        }
        levels
    }

    /// Grey-level byte image of `sample`; bad pixels are rendered black.
    pub fn to_u8(&self, sample: &Sample) -> Array2<u8> {
        self.normalize_sample(sample).mapv(|level| {
            if level.is_nan() {
                0
            } else {
                (level.clamp(0.0, 1.0) * 255.0).round() as u8
            }
        })
    }
}
