//! Piecewise-linear lookup used by histogram-equalization stretches.

use thiserror::Error;

/// Errors that can occur while building or querying an interpolation table.
#[derive(Error, Debug, PartialEq)]
pub enum InterpError {
    #[error("Input vectors must have at least 1 point")]
    InsufficientData,
    #[error("Input vectors must have the same length")]
    MismatchedLengths,
    #[error("X values must be sorted in ascending order")]
    UnsortedData,
}

/// Check that `xs` and `ys` form a usable lookup table.
pub fn check_table(xs: &[f64], ys: &[f64]) -> Result<(), InterpError> {
    if xs.len() != ys.len() {
        return Err(InterpError::MismatchedLengths);
    }
    if xs.is_empty() {
        return Err(InterpError::InsufficientData);
    }
    if xs.windows(2).any(|w| w[1] < w[0]) {
        return Err(InterpError::UnsortedData);
    }
    Ok(())
}

/// Linear interpolation that clamps to the end values outside the table.
///
/// `xs` must be non-decreasing; repeated x values are allowed. The table is
/// assumed to have passed [`check_table`].
pub fn interp_clamped(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }

    // First element > x; xs[idx - 1] <= x < xs[idx] so the interval has width
    let idx = xs.partition_point(|&val| val <= x);
    let (x1, x2) = (xs[idx - 1], xs[idx]);
    let (y1, y2) = (ys[idx - 1], ys[idx]);

    let t = (x - x1) / (x2 - x1);
    y1 + t * (y2 - y1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let xs = vec![1.0, 2.0, 3.0, 4.0];
        let ys = vec![10.0, 20.0, 30.0, 40.0];
        assert_eq!(interp_clamped(2.0, &xs, &ys), 20.0);
    }

    #[test]
    fn test_linear_interpolation() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![10.0, 20.0, 30.0];
        assert_eq!(interp_clamped(1.5, &xs, &ys), 15.0);
        assert_eq!(interp_clamped(2.5, &xs, &ys), 25.0);
    }

    #[test]
    fn test_clamps_outside_range() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![10.0, 20.0, 30.0];
        assert_eq!(interp_clamped(0.5, &xs, &ys), 10.0);
        assert_eq!(interp_clamped(3.5, &xs, &ys), 30.0);
        assert!(interp_clamped(f64::NAN, &xs, &ys).is_nan());
    }

    #[test]
    fn test_repeated_x_values() {
        let xs = vec![0.0, 1.0, 1.0, 2.0];
        let ys = vec![0.0, 0.25, 0.75, 1.0];
        assert_eq!(interp_clamped(0.5, &xs, &ys), 0.125);
        assert_eq!(interp_clamped(1.5, &xs, &ys), 0.875);
    }

    #[test]
    fn test_check_table() {
        assert_eq!(
            check_table(&[1.0, 2.0], &[1.0]),
            Err(InterpError::MismatchedLengths)
        );
        assert_eq!(check_table(&[], &[]), Err(InterpError::InsufficientData));
        assert_eq!(
            check_table(&[2.0, 1.0], &[0.0, 1.0]),
            Err(InterpError::UnsortedData)
        );
        assert!(check_table(&[1.0, 1.0, 2.0], &[0.0, 0.5, 1.0]).is_ok());
    }
}
