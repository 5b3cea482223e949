//! Image samples with optional invalid-pixel masks.
//!
//! A [`Sample`] pairs a 2D array of measurements with an optional mask of
//! invalid entries and a record of whether the data was integer-typed. All
//! statistics computed downstream go through [`Sample::valid_values`], which
//! drops masked entries as well as NaN and infinite values.

use crate::algo::stats::min_max;
use ndarray::{Array2, ArrayD, ArrayView2, IxDyn};
use thiserror::Error;

/// Errors raised while assembling a sample.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Mask shape {mask:?} does not match data shape {data:?}")]
    MaskShape {
        data: (usize, usize),
        mask: (usize, usize),
    },
}

/// Numeric type of the data before conversion to `f64`.
///
/// Integer data with a small value range is displayed with min/max limits
/// rather than a statistical interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    Float,
    Integer,
}

/// 2D array of measurements with an optional invalid-entry mask.
#[derive(Debug, Clone)]
pub struct Sample {
    data: Array2<f64>,
    /// `true` marks an invalid entry
    mask: Option<Array2<bool>>,
    kind: SampleKind,
}

impl Sample {
    /// Create a floating point sample with no mask.
    pub fn new(data: Array2<f64>) -> Self {
        Self {
            data,
            mask: None,
            kind: SampleKind::Float,
        }
    }

    /// Create a sample from integer-typed pixels (u8, u16, i32, ...).
    pub fn from_integers<T>(data: ArrayView2<T>) -> Self
    where
        T: Copy + Into<f64>,
    {
        Self {
            data: data.mapv(Into::into),
            mask: None,
            kind: SampleKind::Integer,
        }
    }

    /// Create a sample from boolean pixels, treated as integer 0/1 data.
    pub fn from_bools(data: ArrayView2<bool>) -> Self {
        Self {
            data: data.mapv(|b| if b { 1.0 } else { 0.0 }),
            mask: None,
            kind: SampleKind::Integer,
        }
    }

    /// Attach a mask of invalid entries (`true` = invalid).
    pub fn with_mask(mut self, mask: Array2<bool>) -> Result<Self, SampleError> {
        if mask.dim() != self.data.dim() {
            return Err(SampleError::MaskShape {
                data: self.data.dim(),
                mask: mask.dim(),
            });
        }
        self.mask = Some(mask);
        Ok(self)
    }

    /// Override the recorded numeric kind.
    pub fn with_kind(mut self, kind: SampleKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn mask(&self) -> Option<&Array2<bool>> {
        self.mask.as_ref()
    }

    pub fn kind(&self) -> SampleKind {
        self.kind
    }

    /// Shape as (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Whether the entry at `(row, col)` is flagged in the mask.
    pub fn is_masked(&self, row: usize, col: usize) -> bool {
        self.mask
            .as_ref()
            .and_then(|m| m.get((row, col)).copied())
            .unwrap_or(false)
    }

    /// Whether the entry at `(row, col)` takes part in statistics.
    pub fn is_valid(&self, row: usize, col: usize) -> bool {
        match self.data.get((row, col)) {
            Some(v) => v.is_finite() && !self.is_masked(row, col),
            None => false,
        }
    }

    /// Flattened finite, unmasked values in row-major order.
    pub fn valid_values(&self) -> Vec<f64> {
        match &self.mask {
            Some(mask) => self
                .data
                .iter()
                .zip(mask.iter())
                .filter(|(v, masked)| !**masked && v.is_finite())
                .map(|(&v, _)| v)
                .collect(),
            None => self.data.iter().copied().filter(|v| v.is_finite()).collect(),
        }
    }

    /// Number of entries that take part in statistics.
    pub fn valid_count(&self) -> usize {
        self.valid_values().len()
    }

    /// Minimum and maximum of the valid entries.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        min_max(&self.valid_values())
    }

    /// Peak-to-peak range (max - min) of the valid entries.
    pub fn peak_to_peak(&self) -> Option<f64> {
        self.finite_range().map(|(lo, hi)| hi - lo)
    }
}

/// Drop all length-1 axes from an array.
pub(crate) fn squeeze(array: ArrayD<f64>) -> ArrayD<f64> {
    let dims: Vec<usize> = array.shape().iter().copied().filter(|&d| d != 1).collect();
    if dims.len() == array.ndim() {
        return array;
    }
    let values: Vec<f64> = array.iter().copied().collect();
    // Row-major iteration order is preserved when only unit axes are removed,
    // so the element count always matches.
    ArrayD::from_shape_vec(IxDyn(&dims), values).unwrap_or(array)
}
