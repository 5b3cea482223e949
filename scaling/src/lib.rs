//! Colour scaling for image and frame-sequence display.
//!
//! This crate holds the data side of an interactive image viewer: choosing
//! colour limits for an image, mapping values to display levels, and keeping
//! the colour-bar histogram and contrast sliders consistent as limits or
//! frames change. Rendering is left to the caller.
//!
//! # Core Modules
//!
//! - `interval`: colour-limit estimation (min/max, percentile, zscale and the
//!   automatic choice between them), with a (0, 1) fallback for samples with
//!   no valid values
//! - `stretch` / `normalize`: interval-then-stretch mapping to [0, 1]
//! - `histogram` / `sliders`: colour-bar histogram and slider state
//! - `display` / `video`: image and frame-stack display models
//! - `config` / `io` / `figsize`: settings, image files and figure sizing
//!
//! # Example
//!
//! ```
//! use ndarray::Array2;
//! use scaling::{estimate, Method, Sample};
//!
//! let data = Array2::from_shape_fn((10, 10), |(r, c)| (r * 10 + c) as f64);
//! let result = estimate(&Sample::new(data), &Method::MinMax).unwrap();
//! assert_eq!(result.limits.as_tuple(), (0.0, 99.0));
//! ```

pub mod algo;
pub mod config;
pub mod display;
pub mod figsize;
pub mod histogram;
pub mod interval;
pub mod io;
pub mod normalize;
pub mod sample;
pub mod sliders;
pub mod stretch;
pub mod video;

pub use config::{ConfigError, DisplayConfig};
pub use display::{DisplayError, ImageDisplay};
pub use histogram::{ColourBarHistogram, HistogramConfig, Orientation, Shade};
pub use interval::{
    estimate, estimate_by_name, DegenerateInput, Estimate, IntervalError, Limits, Method,
    ZScaleParams,
};
pub use normalize::{ImageNormalize, NormalizeError};
pub use sample::{Sample, SampleError, SampleKind};
pub use sliders::{ClimSliders, Handle};
pub use stretch::{Stretch, StretchError};
pub use video::{Changed, ScrollDirection, VideoDisplay};
