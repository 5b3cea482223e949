//! Two-handle contrast control.
//!
//! The handles sit inside value bounds taken from the data range and are
//! kept at least `min_span` apart. The span is 1% of the colour limits the
//! sliders start from, not of the data range, so a single outlier does not
//! stop the handles reaching the estimated limits.

use crate::interval::Limits;

/// Which handle of the slider is being moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Lower,
    Upper,
}

/// Slider state for the low and high colour limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimSliders {
    valmin: f64,
    valmax: f64,
    lower: f64,
    upper: f64,
    min_span: f64,
}

impl ClimSliders {
    /// Create sliders spanning `bounds` with handles at `limits`.
    ///
    /// The minimum handle separation is fixed at 1% of the width of `limits`.
    /// Flat limits fall back to 1% of the bounds, then to `f64::EPSILON`.
    pub fn new(bounds: Limits, limits: Limits) -> Self {
        let min_span = [limits.width(), bounds.width()]
            .into_iter()
            .map(|width| width / 100.0)
            .find(|span| *span > 0.0 && span.is_finite())
            .unwrap_or(f64::EPSILON);
        let mut sliders = Self {
            valmin: bounds.low,
            valmax: bounds.high,
            lower: bounds.low,
            upper: bounds.high,
            min_span,
        };
        sliders.set_positions(limits);
        sliders
    }

    /// Value bounds as (valmin, valmax).
    pub fn bounds(&self) -> Limits {
        Limits::new(self.valmin, self.valmax)
    }

    pub fn min_span(&self) -> f64 {
        self.min_span
    }

    /// Current handle positions.
    pub fn positions(&self) -> Limits {
        Limits {
            low: self.lower,
            high: self.upper,
        }
    }

    /// Replace the value bounds.
    ///
    /// Handle positions are left where they are, even outside the new
    /// bounds; they follow the colour limits, not the data range.
    pub fn set_bounds(&mut self, bounds: Limits) {
        self.valmin = bounds.low;
        self.valmax = bounds.high;
    }

    /// Place both handles, clamped into the bounds; returns the positions.
    pub fn set_positions(&mut self, limits: Limits) -> Limits {
        self.lower = self.clamp(limits.low);
        self.upper = self.clamp(limits.high);
        if self.upper - self.lower < self.min_span {
            self.upper = (self.lower + self.min_span).min(self.valmax);
            self.lower = self.lower.min(self.upper - self.min_span).max(self.valmin);
        }
        self.positions()
    }

    /// Move one handle to `value`; returns the new positions.
    ///
    /// The value is clamped to the bounds and to `min_span` from the other
    /// handle.
    pub fn move_handle(&mut self, handle: Handle, value: f64) -> Limits {
        let value = self.clamp(value);
        match handle {
            Handle::Lower => {
                self.lower = value.min(self.upper - self.min_span).max(self.valmin);
            }
            Handle::Upper => {
                self.upper = value.max(self.lower + self.min_span).min(self.valmax);
            }
        }
        self.positions()
    }

    fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.valmin;
        }
        value.clamp(self.valmin, self.valmax.max(self.valmin))
    }
}
