//! Order-independent reductions over profit samples.
//!
//! All helpers return 0.0 for empty input; the aggregator guards against
//! empty sample sets before any reduction runs.

use crate::numbers::{floor_f64_to_usize, usize_to_f64};

/// Arithmetic mean.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / usize_to_f64(values.len())
}

/// Population standard deviation (divides by N, not N-1).
#[must_use]
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let center = mean(values);
    let variance = values
        .iter()
        .map(|value| (value - center).powi(2))
        .sum::<f64>()
        / usize_to_f64(values.len());
    variance.sqrt()
}

/// Percentile of a pre-sorted sample using linear interpolation between the
/// two nearest ranks. `pct` is clamped to [0, 100].
#[must_use]
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = pct.clamp(0.0, 100.0) / 100.0 * usize_to_f64(sorted.len() - 1);
    let lower = floor_f64_to_usize(rank);
    let upper = (lower + 1).min(sorted.len() - 1);
    let weight = rank - rank.floor();
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Median of a pre-sorted sample.
#[must_use]
pub fn median(sorted: &[f64]) -> f64 {
    percentile(sorted, 50.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_known_sample() {
        assert!((mean(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < f64::EPSILON);
        assert!(mean(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn population_std_divides_by_n() {
        // Variance of [2, 4, 4, 4, 5, 5, 7, 9] is exactly 4.
        let sample = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((population_std(&sample) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn percentiles_interpolate_linearly() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert!((percentile(&sorted, 0.0) - 1.0).abs() < 1e-12);
        assert!((percentile(&sorted, 100.0) - 4.0).abs() < 1e-12);
        assert!((percentile(&sorted, 25.0) - 1.75).abs() < 1e-12);
        assert!((percentile(&sorted, 75.0) - 3.25).abs() < 1e-12);
        assert!((percentile(&sorted, 50.0) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn median_of_odd_sample_is_middle_element() {
        let sorted = [1.0, 5.0, 9.0];
        assert!((median(&sorted) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn single_element_sample_is_its_own_percentile() {
        let sorted = [7.5];
        assert!((percentile(&sorted, 25.0) - 7.5).abs() < 1e-12);
        assert!((median(&sorted) - 7.5).abs() < 1e-12);
    }
}
