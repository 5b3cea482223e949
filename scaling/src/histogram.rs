//! Colour-bar histogram model.
//!
//! The histogram sits next to the colour bar: its value axis shares the data
//! scale of the colour limits, and each bar is shaded with the display level
//! of its bin centre. Bars outside the colour limits are flagged as
//! under/over range so a renderer can grey them out.
//!
//! Binning follows the usual conventions: equal-width bins over a range,
//! half-open except for the last bin which includes its right edge, and
//! values outside the range ignored.

use crate::interval::Limits;
use crate::normalize::ImageNormalize;
use crate::sample::{Sample, SampleKind};
use serde::{Deserialize, Serialize};

/// Default maximum number of bins.
pub const DEFAULT_BINS: usize = 50;

/// Default ratio of the histogram range to the colour-limit width.
pub const DEFAULT_RANGE_WIDTH: f64 = 1.2;

/// Which way the bars extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Bars grow along x; the value axis is vertical
    #[default]
    Horizontal,
    Vertical,
}

/// Configuration for the colour-bar histogram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    /// Maximum number of bins
    pub bins: usize,
    /// Histogram range as a multiple of the colour-limit width
    pub range_width: f64,
    /// Logarithmic count axis
    pub log: bool,
    pub orientation: Orientation,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            range_width: DEFAULT_RANGE_WIDTH,
            log: true,
            orientation: Orientation::Horizontal,
        }
    }
}

/// Colour assigned to a histogram bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shade {
    /// Bin centre below the low colour limit
    Under,
    /// Bin centre above the high colour limit
    Over,
    /// Display level in [0, 1]
    Level(f64),
}

/// Axis limits for drawing the histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewLimits {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

/// Number of bins to use for `sample`.
///
/// Integer data with a narrow range gets one bin per integer step so that
/// discrete values are not split across bins.
pub fn auto_bins(sample: &Sample, max_bins: usize) -> usize {
    let max_bins = max_bins.max(1);
    match (sample.kind(), sample.peak_to_peak()) {
        (SampleKind::Integer, Some(ptp)) => (ptp as usize).clamp(1, max_bins),
        _ => max_bins,
    }
}

/// Histogram range centred on the colour limits and `width` times wider.
///
/// Zero-width limits fall back to the data range, and a flat data range is
/// widened to one unit around its value.
pub fn auto_range(limits: Limits, data_range: Option<(f64, f64)>, width: f64) -> (f64, f64) {
    if limits.is_flat() {
        log::warn!("Colour range is 0! Falling back to min-max range.");
        return match data_range {
            Some((lo, hi)) if lo < hi => (lo, hi),
            Some((v, _)) => (v - 0.5, v + 0.5),
            None => Limits::FALLBACK.as_tuple(),
        };
    }

    let half = 0.5 * limits.width() * width;
    let m = limits.center();
    (m - half, m + half)
}

/// Equal-width bin edges and counts of `values` over `range`.
pub fn bin_counts(values: &[f64], bins: usize, range: (f64, f64)) -> (Vec<f64>, Vec<u64>) {
    let bins = bins.max(1);
    let (lo, hi) = range;
    let step = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + step * i as f64).collect();
    let mut counts = vec![0u64; bins];

    if hi <= lo {
        return (edges, counts);
    }

    for &v in values {
        if !(lo..=hi).contains(&v) {
            continue;
        }
        let idx = (((v - lo) / (hi - lo)) * bins as f64) as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    (edges, counts)
}

/// Histogram of image values drawn alongside the colour bar.
#[derive(Debug, Clone)]
pub struct ColourBarHistogram {
    config: HistogramConfig,
    edges: Vec<f64>,
    counts: Vec<u64>,
    shades: Vec<Shade>,
    data_range: Option<(f64, f64)>,
}

impl ColourBarHistogram {
    /// Bin the valid values of `sample` around the limits of `norm`.
    pub fn new(sample: &Sample, norm: &ImageNormalize, config: HistogramConfig) -> Self {
        let mut histogram = Self {
            config,
            edges: Vec::new(),
            counts: Vec::new(),
            shades: Vec::new(),
            data_range: None,
        };
        histogram.recompute(sample, norm);
        histogram
    }

    /// Re-bin for new image data (e.g. a new video frame).
    pub fn recompute(&mut self, sample: &Sample, norm: &ImageNormalize) {
        let values = sample.valid_values();
        self.data_range = sample.finite_range();

        let bins = auto_bins(sample, self.config.bins);
        let range = auto_range(norm.limits(), self.data_range, self.config.range_width);
        let (edges, counts) = bin_counts(&values, bins, range);
        self.edges = edges;
        self.counts = counts;
        self.update_shades(norm);
    }

    /// Recolour the bars after the colour limits or stretch changed.
    pub fn update_shades(&mut self, norm: &ImageNormalize) {
        self.shades = self
            .centers()
            .into_iter()
            .map(|c| {
                let position = norm.scale(c);
                if position < 0.0 {
                    Shade::Under
                } else if position > 1.0 {
                    Shade::Over
                } else {
                    Shade::Level(norm.apply(c))
                }
            })
            .collect();
    }

    pub fn config(&self) -> &HistogramConfig {
        &self.config
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn shades(&self) -> &[Shade] {
        &self.shades
    }

    /// Midpoints of the bins.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    /// Number of values that fell inside the histogram range.
    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Axis limits slightly wider than the colour limits.
    ///
    /// The count axis starts at 0.1 on a log scale (0 otherwise); the value
    /// axis is the auto range. Axes are swapped for vertical bars.
    pub fn view_limits(&self, limits: Limits) -> ViewLimits {
        let count_min = if self.config.log { 0.1 } else { 0.0 };
        let count_max = (self.max_count() as f64).max(1.0);
        let counts = (count_min, count_max);
        let values = auto_range(limits, self.data_range, self.config.range_width);

        match self.config.orientation {
            Orientation::Horizontal => ViewLimits {
                x: counts,
                y: values,
            },
            Orientation::Vertical => ViewLimits {
                x: values,
                y: counts,
            },
        }
    }
}
