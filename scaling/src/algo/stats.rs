//! Order statistics and moments over filtered samples

use std::cmp::Ordering;

/// Sort a slice of finite values in ascending order.
///
/// Callers are expected to have removed NaN values already; any that slip
/// through compare equal so the sort never panics.
pub fn sort_values(values: &mut [f64]) {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
}

/// Minimum and maximum of a slice, or `None` if it is empty.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let mut iter = values.iter().copied();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// Percentile of already-sorted values using linear interpolation between ranks.
///
/// Matches the conventional "linear" estimator: the fractional rank is
/// `p / 100 * (n - 1)` and the result interpolates between the two
/// neighbouring order statistics.
///
/// # Arguments
/// * `sorted` - Values sorted in ascending order (must be non-empty)
/// * `percent` - Percentile in the range [0, 100]
///
/// # Returns
/// `None` if `sorted` is empty
pub fn percentile_sorted(sorted: &[f64], percent: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let rank = (percent.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    let frac = rank - below as f64;

    if below == above {
        return Some(sorted[below]);
    }
    let (lo, hi) = (sorted[below], sorted[above]);
    let diff = hi - lo;
    if diff.is_finite() {
        Some(lo + frac * diff)
    } else {
        // neighbours span more than f64::MAX
        Some(lo * (1.0 - frac) + hi * frac)
    }
}

/// Calculate median of already-sorted values.
///
/// For even-length data, returns the average of the two middle values.
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Population standard deviation (ddof = 0) of the given values.
pub fn std_dev<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let values: Vec<f64> = values.into_iter().collect();
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_min_max_basic() {
        assert_eq!(min_max(&[3.0, -1.0, 7.5, 2.0]), Some((-1.0, 7.5)));
        assert_eq!(min_max(&[4.0]), Some((4.0, 4.0)));
        assert_eq!(min_max(&[]), None);
    }

    #[test]
    fn test_percentile_endpoints() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        assert_eq!(percentile_sorted(&values, 0.0), Some(1.0));
        assert_eq!(percentile_sorted(&values, 100.0), Some(100.0));
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let values = vec![1.0, 2.0, 3.0, 4.0];
        // rank = 0.5 * 3 = 1.5 -> halfway between 2 and 3
        assert_relative_eq!(percentile_sorted(&values, 50.0).unwrap(), 2.5);
        // rank = 0.25 * 3 = 0.75
        assert_relative_eq!(percentile_sorted(&values, 25.0).unwrap(), 1.75);
    }

    #[test]
    fn test_percentile_default_clip_range() {
        let values: Vec<f64> = (0..=1000).map(f64::from).collect();
        assert_relative_eq!(percentile_sorted(&values, 0.25).unwrap(), 2.5);
        assert_relative_eq!(percentile_sorted(&values, 99.75).unwrap(), 997.5);
    }

    #[test]
    fn test_percentile_extreme_neighbours() {
        let values = vec![-1e308, 1e308];
        let mid = percentile_sorted(&values, 50.0).unwrap();
        assert!(mid.is_finite());
        assert_relative_eq!(mid, 0.0);
        let upper = percentile_sorted(&values, 75.0).unwrap();
        assert_relative_eq!(upper, 5e307, max_relative = 1e-12);
    }

    #[test]
    fn test_percentile_single_and_empty() {
        assert_eq!(percentile_sorted(&[42.0], 13.0), Some(42.0));
        assert_eq!(percentile_sorted(&[], 50.0), None);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median_sorted(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
        assert_eq!(median_sorted(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(median_sorted(&[]), None);
    }

    #[test]
    fn test_sort_values_unsorted_input() {
        let mut values = vec![10.0, 1.0, 5.0, 3.0, 8.0];
        sort_values(&mut values);
        assert_eq!(values, vec![1.0, 3.0, 5.0, 8.0, 10.0]);
    }

    #[test]
    fn test_std_dev() {
        let sd = std_dev(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_relative_eq!(sd, 2.0);
        assert_eq!(std_dev(Vec::new()), None);
        assert_eq!(std_dev(vec![5.0; 10]), Some(0.0));
    }
}
