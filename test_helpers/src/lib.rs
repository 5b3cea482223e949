//! Test helpers for the colour-scaling workspace
//!
//! Provides a shared output directory for test artifacts and deterministic
//! synthetic images (gradients, noisy sky backgrounds, star fields).

use ndarray::Array2;
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use std::env;
use std::path::{Path, PathBuf};

/// Error type for test helper operations
#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    #[error("Failed to find workspace root: {0}")]
    WorkspaceRootNotFound(String),
}

/// Walk up from the current directory to the workspace `Cargo.toml`.
pub fn find_workspace_root() -> Result<PathBuf, TestHelperError> {
    let mut dir = env::current_dir()
        .map_err(|e| TestHelperError::WorkspaceRootNotFound(format!("no current dir: {e}")))?;

    loop {
        let manifest = dir.join("Cargo.toml");
        if let Ok(content) = std::fs::read_to_string(&manifest) {
            if content.contains("[workspace]") {
                return Ok(dir);
            }
        }
        if !dir.pop() {
            break;
        }
    }

    Err(TestHelperError::WorkspaceRootNotFound(
        "no Cargo.toml with [workspace] above current directory".to_string(),
    ))
}

static WORKSPACE_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_workspace_root().expect("Failed to find workspace root directory"));

/// Directory for test artifacts such as rendered previews; created on demand.
pub fn get_output_dir() -> PathBuf {
    let output_dir = WORKSPACE_ROOT.join("test_output");
    std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");
    output_dir
}

/// Path of `path` inside the output directory.
pub fn output_path<P: AsRef<Path>>(path: P) -> PathBuf {
    get_output_dir().join(path)
}

/// Horizontal ramp from `low` at the left edge to `high` at the right edge.
pub fn gradient_image(size: (usize, usize), low: f64, high: f64) -> Array2<f64> {
    let (_, cols) = size;
    let step = if cols > 1 {
        (high - low) / (cols - 1) as f64
    } else {
        0.0
    };
    Array2::from_shape_fn(size, |(_, c)| low + step * c as f64)
}

/// Gaussian sky background with mean `level` and standard deviation `sigma`.
pub fn sky_background(size: (usize, usize), level: f64, sigma: f64, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(level, sigma).expect("sigma must be finite and non-negative");
    Array2::from_shape_fn(size, |_| normal.sample(&mut rng))
}

/// Sky background with `n_stars` bright Gaussian point sources.
///
/// Star peaks are drawn uniformly from `[peak / 2, peak]` above the
/// background; the profile sigma is 1.2 pixels.
pub fn star_field(
    size: (usize, usize),
    n_stars: usize,
    background: f64,
    noise: f64,
    peak: f64,
    seed: u64,
) -> Array2<f64> {
    let mut image = sky_background(size, background, noise, seed);
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let (rows, cols) = size;
    let sigma: f64 = 1.2;
    let radius = (4.0 * sigma).ceil() as isize;

    for _ in 0..n_stars {
        let cy = rng.gen_range(0.0..rows as f64);
        let cx = rng.gen_range(0.0..cols as f64);
        let amplitude = rng.gen_range(0.5 * peak..=peak);

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let r = cy as isize + dy;
                let c = cx as isize + dx;
                if r < 0 || c < 0 || r >= rows as isize || c >= cols as isize {
                    continue;
                }
                let (r, c) = (r as usize, c as usize);
                let d2 = (r as f64 + 0.5 - cy).powi(2) + (c as f64 + 0.5 - cx).powi(2);
                image[[r, c]] += amplitude * (-d2 / (2.0 * sigma * sigma)).exp();
            }
        }
    }

    image
}

/// Replace a random `fraction` of the pixels with NaN.
pub fn with_nans(mut image: Array2<f64>, fraction: f64, seed: u64) -> Array2<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    image.mapv_inplace(|v| if rng.gen_bool(fraction) { f64::NAN } else { v });
    image
}

/// Random invalid-pixel mask with roughly `fraction` of entries set.
pub fn random_mask(size: (usize, usize), fraction: f64, seed: u64) -> Array2<bool> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn(size, |_| rng.gen_bool(fraction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_exists() {
        let root = find_workspace_root().expect("Failed to find workspace root");
        assert!(root.join("Cargo.toml").exists());
    }

    #[test]
    fn test_output_path() {
        let path = output_path("preview.png");
        assert_eq!(path, get_output_dir().join("preview.png"));
        assert!(get_output_dir().is_dir());
    }

    #[test]
    fn test_gradient_endpoints() {
        let image = gradient_image((3, 5), 10.0, 20.0);
        assert_eq!(image[[0, 0]], 10.0);
        assert_eq!(image[[2, 4]], 20.0);
        assert_eq!(image[[1, 2]], 15.0);
    }

    #[test]
    fn test_generators_are_deterministic() {
        let a = star_field((32, 32), 5, 100.0, 3.0, 1000.0, 7);
        let b = star_field((32, 32), 5, 100.0, 3.0, 1000.0, 7);
        assert_eq!(a, b);
        assert!(a.iter().cloned().fold(f64::MIN, f64::max) > 400.0);

        let mask = random_mask((20, 20), 0.25, 3);
        let set = mask.iter().filter(|&&m| m).count();
        assert!(set > 50 && set < 150);
    }

    #[test]
    fn test_with_nans_fraction() {
        let image = with_nans(gradient_image((20, 20), 0.0, 1.0), 0.1, 11);
        let nans = image.iter().filter(|v| v.is_nan()).count();
        assert!(nans > 10 && nans < 80);
    }
}
