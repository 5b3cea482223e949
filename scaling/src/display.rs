//! Headless model of an image display with colour bar, histogram and sliders.
//!
//! [`ImageDisplay`] owns everything a renderer needs to draw a single image:
//! the data, the normalizer holding the current colour limits, the slider
//! state, and the colour-bar histogram. User interaction is modelled by
//! [`ImageDisplay::move_slider`] and [`ImageDisplay::set_clim`], which keep
//! these parts consistent with each other.

use crate::config::{ConfigError, DisplayConfig};
use crate::figsize::{guess_figsize, FigSizeError};
use crate::histogram::{ColourBarHistogram, ViewLimits};
use crate::interval::{Estimate, Limits};
use crate::normalize::{ImageNormalize, NormalizeError};
use crate::sample::{squeeze, Sample, SampleError};
use crate::sliders::{ClimSliders, Handle};
use ndarray::{Array2, ArrayD, Ix2};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("Cannot image {ndim}D data.{}", dimensionality_hint(.ndim))]
    Dimensionality { ndim: usize },

    #[error("Video data must be 2D or 3D (frames, rows, cols), got {ndim}D")]
    VideoDimensionality { ndim: usize },

    #[error("Video contains no frames")]
    NoFrames,

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    FigSize(#[from] FigSizeError),
}

fn dimensionality_hint(ndim: &usize) -> &'static str {
    if *ndim == 3 {
        " Use `VideoDisplay` to image 3D data."
    } else {
        ""
    }
}

/// Convenience type alias for display results
pub type Result<T> = std::result::Result<T, DisplayError>;

/// Image with colour limits, sliders and colour-bar histogram.
#[derive(Debug, Clone)]
pub struct ImageDisplay {
    sample: Sample,
    config: DisplayConfig,
    norm: ImageNormalize,
    estimate: Estimate,
    sliders: Option<ClimSliders>,
    histogram: Option<ColourBarHistogram>,
}

impl ImageDisplay {
    /// Display an n-dimensional array after dropping unit axes.
    ///
    /// Anything other than 2D after squeezing is rejected.
    pub fn new(data: ArrayD<f64>, config: DisplayConfig) -> Result<Self> {
        let data = squeeze(data);
        let ndim = data.ndim();
        let image = data
            .into_dimensionality::<Ix2>()
            .map_err(|_| DisplayError::Dimensionality { ndim })?;
        Self::from_sample(Sample::new(image), config)
    }

    /// Display a prepared sample (mask and integer kind preserved).
    pub fn from_sample(sample: Sample, config: DisplayConfig) -> Result<Self> {
        config.validate()?;

        let (mut norm, estimate) = ImageNormalize::from_sample(
            &sample,
            &config.interval,
            config.stretch.clone(),
            config.clip,
        )?;
        log::debug!("Auto clims: {}", estimate.limits);

        let sliders = config.show_sliders.then(|| {
            let sliders = ClimSliders::new(data_bounds(&sample), norm.limits());
            // limits beyond the data range are pulled to the slider ends
            norm.set_limits(sliders.positions());
            sliders
        });
        let histogram = config
            .show_histogram
            .then(|| ColourBarHistogram::new(&sample, &norm, config.histogram));

        Ok(Self {
            sample,
            config,
            norm,
            estimate,
            sliders,
            histogram,
        })
    }

    pub fn sample(&self) -> &Sample {
        &self.sample
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn norm(&self) -> &ImageNormalize {
        &self.norm
    }

    /// Estimate that produced the initial colour limits.
    pub fn estimate(&self) -> &Estimate {
        &self.estimate
    }

    pub fn sliders(&self) -> Option<&ClimSliders> {
        self.sliders.as_ref()
    }

    pub fn histogram(&self) -> Option<&ColourBarHistogram> {
        self.histogram.as_ref()
    }

    /// Current colour limits.
    pub fn clim(&self) -> Limits {
        self.norm.limits()
    }

    /// Set the colour limits and bring sliders and histogram shading in line.
    ///
    /// With sliders, the limits are first clamped to the slider bounds and
    /// min span, and the clamped value becomes the colour limits.
    pub fn set_clim(&mut self, limits: Limits) {
        let limits = match self.sliders.as_mut() {
            Some(sliders) => sliders.set_positions(limits),
            None => limits,
        };
        self.norm.set_limits(limits);
        if let Some(histogram) = self.histogram.as_mut() {
            histogram.update_shades(&self.norm);
        }
    }

    /// Drag a slider handle; returns the resulting colour limits.
    ///
    /// Without sliders this is a no-op returning `None`.
    pub fn move_slider(&mut self, handle: Handle, value: f64) -> Option<Limits> {
        let limits = self.sliders.as_mut()?.move_handle(handle, value);
        self.norm.set_limits(limits);
        if let Some(histogram) = self.histogram.as_mut() {
            histogram.update_shades(&self.norm);
        }
        Some(limits)
    }

    /// Axis limits for the histogram at the current colour limits.
    pub fn histogram_view(&self) -> Option<ViewLimits> {
        self.histogram
            .as_ref()
            .map(|histogram| histogram.view_limits(self.norm.limits()))
    }

    /// Display levels in [0, 1]; bad pixels are NaN.
    pub fn levels(&self) -> Array2<f64> {
        self.norm.normalize_sample(&self.sample)
    }

    /// Grey-level byte rendering of the image.
    pub fn to_u8(&self) -> Array2<u8> {
        self.norm.to_u8(&self.sample)
    }

    /// Figure (width, height) in inches that fits the configured screen.
    pub fn figsize(&self) -> Result<(f64, f64)> {
        Ok(guess_figsize(
            self.sample.dim(),
            self.config.screen_inches,
            self.config.fill_factor,
        )?)
    }

    /// Cursor readout for data coordinates `(x, y)`.
    ///
    /// Pixel centres sit on integer coordinates. Inside the image the value
    /// under the cursor is appended as `z=`, or `masked_str` for masked
    /// pixels.
    pub fn format_coord(&self, x: f64, y: f64, precision: usize, masked_str: &str) -> String {
        let xy = format!("x={x:.precision$}, y={y:.precision$}");

        let (nrows, ncols) = self.sample.dim();
        let (col, row) = ((x + 0.5).floor(), (y + 0.5).floor());
        if !(col >= 0.0 && row >= 0.0 && col < ncols as f64 && row < nrows as f64) {
            return xy;
        }

        let (row, col) = (row as usize, col as usize);
        if self.sample.is_masked(row, col) {
            return format!("{xy}, z={masked_str}");
        }
        let z = self.sample.data()[[row, col]];
        format!("{xy}, z={z:.precision$}")
    }

    /// Swap in new image data without touching the colour limits.
    pub(crate) fn set_sample(&mut self, sample: Sample) {
        self.sample = sample;
    }

    pub(crate) fn sliders_mut(&mut self) -> Option<&mut ClimSliders> {
        self.sliders.as_mut()
    }

    /// Re-bin the histogram for the current data; returns whether one exists.
    pub(crate) fn recompute_histogram(&mut self) -> bool {
        match self.histogram.as_mut() {
            Some(histogram) => {
                histogram.recompute(&self.sample, &self.norm);
                true
            }
            None => false,
        }
    }
}

/// Slider bounds for `sample`: its finite range, or the fallback limits.
pub(crate) fn data_bounds(sample: &Sample) -> Limits {
    sample
        .finite_range()
        .map(Limits::from)
        .unwrap_or(Limits::FALLBACK)
}
