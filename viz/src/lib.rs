//! Terminal rendering for colour-scaled images.
//!
//! Text output for the display models in `scaling`, for use over SSH, in
//! logs, or anywhere a graphical display is unavailable.
//!
//! # Core Modules
//!
//! ## Colour-bar histogram (`histogram`)
//! Table of histogram bins with the shade each bin receives under the
//! current colour limits. Bins outside the limits are marked as under/over
//! range, and the rows containing the limits are flagged.
//!
//! ## Image preview (`preview`)
//! Block-averaged ASCII rendering of display levels using a character ramp.
//!
//! # Usage
//! ```rust
//! use ndarray::Array2;
//! use scaling::{DisplayConfig, ImageDisplay, Method, Sample};
//! use viz::histogram::{format_colour_histogram, HistogramConfig};
//!
//! let data = Array2::from_shape_fn((16, 16), |(r, c)| (r * 16 + c) as f64);
//! let config = DisplayConfig { interval: Method::MinMax, ..DisplayConfig::default() };
//! let display = ImageDisplay::from_sample(Sample::new(data), config)?;
//!
//! let table = format_colour_histogram(
//!     display.histogram().unwrap(),
//!     display.clim(),
//!     &HistogramConfig::default(),
//! )?;
//! assert!(table.contains("Count"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use thiserror::Error;

/// Error types for text rendering.
#[derive(Debug, Error)]
pub enum VizError {
    /// Histogram has no bins or an invalid configuration.
    #[error("Histogram error: {0}")]
    HistogramError(String),

    /// Image preview could not be rendered.
    #[error("Preview error: {0}")]
    PreviewError(String),

    #[error("Formatting error: {0}")]
    FmtError(#[from] fmt::Error),
}

/// Standard Result type for rendering operations.
pub type Result<T> = std::result::Result<T, VizError>;

pub mod histogram;
pub mod preview;
