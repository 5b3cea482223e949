//! Figure size that fits an image on screen with its aspect ratio intact.

use thiserror::Error;

/// Default fraction of the screen an image figure may fill.
pub const DEFAULT_FILL_FACTOR: f64 = 0.75;

/// Extra height for the frame indicator under a video.
pub const VIDEO_EXTRA_HEIGHT: f64 = 0.5;

#[derive(Debug, Error, PartialEq)]
pub enum FigSizeError {
    #[error("Image shape must be non-empty, got {0:?}")]
    EmptyShape((usize, usize)),

    #[error("Screen size must be positive, got {0:?}")]
    InvalidScreen((f64, f64)),

    #[error("Fill factor must be in (0, 1], got {0}")]
    InvalidFill(f64),
}

/// Figure (width, height) in inches for an image of `shape` (rows, cols).
///
/// The image is scaled to the largest size that fits inside
/// `screen_inches * fill_factor`.
pub fn guess_figsize(
    shape: (usize, usize),
    screen_inches: (f64, f64),
    fill_factor: f64,
) -> Result<(f64, f64), FigSizeError> {
    let (rows, cols) = shape;
    if rows == 0 || cols == 0 {
        return Err(FigSizeError::EmptyShape(shape));
    }
    let (sw, sh) = screen_inches;
    if !(sw > 0.0 && sh > 0.0 && sw.is_finite() && sh.is_finite()) {
        return Err(FigSizeError::InvalidScreen(screen_inches));
    }
    if !(fill_factor > 0.0 && fill_factor <= 1.0) {
        return Err(FigSizeError::InvalidFill(fill_factor));
    }

    let (max_w, max_h) = (sw * fill_factor, sh * fill_factor);
    let (w, h) = (cols as f64, rows as f64);
    let scale = (max_w / w).min(max_h / h);
    Ok((w * scale, h * scale))
}

/// As [`guess_figsize`], with room for the frame indicator of a video.
pub fn guess_video_figsize(
    shape: (usize, usize),
    screen_inches: (f64, f64),
    fill_factor: f64,
) -> Result<(f64, f64), FigSizeError> {
    let (w, h) = guess_figsize(shape, screen_inches, fill_factor)?;
    Ok((w, h + VIDEO_EXTRA_HEIGHT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_wide_image_limited_by_width() {
        let (w, h) = guess_figsize((100, 400), (16.0, 9.0), 0.75).unwrap();
        assert_relative_eq!(w, 12.0);
        assert_relative_eq!(h, 3.0);
    }

    #[test]
    fn test_tall_image_limited_by_height() {
        let (w, h) = guess_figsize((900, 300), (16.0, 9.0), 1.0).unwrap();
        assert_relative_eq!(h, 9.0);
        assert_relative_eq!(w, 3.0);
        assert_relative_eq!(h / w, 3.0);
    }

    #[test]
    fn test_video_adds_indicator_height() {
        let (w, h) = guess_video_figsize((100, 100), (10.0, 10.0), 0.5).unwrap();
        assert_relative_eq!(w, 5.0);
        assert_relative_eq!(h, 5.5);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            guess_figsize((0, 10), (10.0, 10.0), 0.5),
            Err(FigSizeError::EmptyShape((0, 10)))
        );
        assert!(matches!(
            guess_figsize((10, 10), (-1.0, 10.0), 0.5),
            Err(FigSizeError::InvalidScreen(_))
        ));
        assert_eq!(
            guess_figsize((10, 10), (10.0, 10.0), 0.0),
            Err(FigSizeError::InvalidFill(0.0))
        );
    }
}
