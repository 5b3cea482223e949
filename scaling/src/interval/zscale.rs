//! Sky-background-aware colour limits (the IRAF "zscale" algorithm).
//!
//! The sorted values of a subsample are fitted with a straight line while
//! iteratively rejecting outliers (stars, hot pixels). The slope of the line
//! through the background, divided by a contrast factor, sets how far the
//! limits extend either side of the median.

use crate::algo::stats::{median_sorted, sort_values, std_dev};
use serde::{Deserialize, Serialize};

/// Tuning parameters of the zscale fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZScaleParams {
    /// Maximum number of values drawn from the input
    pub n_samples: usize,
    /// Scaling applied to the fitted slope; smaller values widen the limits
    pub contrast: f64,
    /// Maximum fraction of samples that may be rejected
    pub max_reject: f64,
    /// Minimum number of samples that must survive rejection
    pub min_npixels: usize,
    /// Rejection threshold in units of the residual standard deviation
    pub krej: f64,
    /// Maximum number of fit/reject iterations
    pub max_iterations: usize,
}

impl Default for ZScaleParams {
    fn default() -> Self {
        Self {
            n_samples: 1000,
            contrast: 0.25,
            max_reject: 0.5,
            min_npixels: 5,
            krej: 2.5,
            max_iterations: 5,
        }
    }
}

/// Least-squares line through the unmasked points `(i, samples[i])`.
///
/// Returns `(slope, intercept)` or `None` when fewer than two points remain.
fn fit_line(samples: &[f64], rejected: &[bool]) -> Option<(f64, f64)> {
    let good: Vec<(f64, f64)> = samples
        .iter()
        .zip(rejected)
        .enumerate()
        .filter(|(_, (_, &bad))| !bad)
        .map(|(i, (&y, _))| (i as f64, y))
        .collect();

    if good.len() < 2 {
        return None;
    }

    let n = good.len() as f64;
    let mean_x = good.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = good.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for &(x, y) in &good {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }

    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

/// Grow rejected regions by a box of `ngrow` samples, centred as a
/// same-length convolution would be.
fn dilate(rejected: &[bool], ngrow: usize) -> Vec<bool> {
    let n = rejected.len() as isize;
    let k = ngrow as isize;
    let offset = (k - 1) / 2;

    (0..n)
        .map(|i| {
            let lo = (i + offset - (k - 1)).max(0);
            let hi = (i + offset).min(n - 1);
            (lo..=hi).any(|j| rejected[j as usize])
        })
        .collect()
}

/// Compute zscale limits from finite values.
///
/// Returns `None` if `values` is empty. When too many samples are rejected
/// for a reliable fit, the full sampled range is returned.
pub fn zscale_limits(values: &[f64], params: &ZScaleParams) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }

    let n_samples = params.n_samples.max(1);
    let stride = (values.len() / n_samples).max(1);
    let mut samples: Vec<f64> = values.iter().copied().step_by(stride).take(n_samples).collect();
    sort_values(&mut samples);

    let npix = samples.len();
    let mut vmin = samples[0];
    let mut vmax = samples[npix - 1];

    let minpix = params
        .min_npixels
        .max((npix as f64 * params.max_reject) as usize);
    let ngrow = ((npix as f64 * 0.01) as usize).max(1);

    let mut rejected = vec![false; npix];
    let mut ngoodpix = npix;
    let mut last_ngoodpix = npix + 1;
    let mut fit = None;

    for _ in 0..params.max_iterations {
        if ngoodpix >= last_ngoodpix || ngoodpix < minpix {
            break;
        }

        let Some((slope, intercept)) = fit_line(&samples, &rejected) else {
            break;
        };
        fit = Some((slope, intercept));

        let flat: Vec<f64> = samples
            .iter()
            .enumerate()
            .map(|(i, &y)| y - (slope * i as f64 + intercept))
            .collect();

        let residual_sd = std_dev(
            flat.iter()
                .zip(&rejected)
                .filter(|(_, &bad)| !bad)
                .map(|(&r, _)| r),
        )
        .unwrap_or(0.0);
        let threshold = params.krej * residual_sd;

        for (bad, &r) in rejected.iter_mut().zip(&flat) {
            if r < -threshold || r > threshold {
                *bad = true;
            }
        }
        rejected = dilate(&rejected, ngrow);

        last_ngoodpix = ngoodpix;
        ngoodpix = rejected.iter().filter(|&&bad| !bad).count();
    }

    if let Some((mut slope, _)) = fit {
        if ngoodpix >= minpix {
            if params.contrast > 0.0 {
                slope /= params.contrast;
            }
            let center = (npix - 1) / 2;
            let median = median_sorted(&samples).unwrap_or(samples[center]);
            vmin = vmin.max(median - (center as f64 - 1.0) * slope);
            vmax = vmax.min(median + (npix - center) as f64 * slope);
        }
    }

    Some((vmin, vmax))
}
