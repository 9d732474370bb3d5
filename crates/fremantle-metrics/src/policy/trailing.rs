//! Trailing twelve month aggregates over two series.

use super::{TRAILING_WINDOW, finite};
use crate::series::AlignedSeries;

/// Sum of the last four numerator quarters over the sum of the last four
/// denominator quarters.
///
/// Both series need all four trailing quarters present and the denominator
/// sum must be non-zero.
pub fn trailing_twelve_month_margin(
    numerator: &AlignedSeries,
    denominator: &AlignedSeries,
) -> Option<f64> {
    let num = numerator.trailing_sum(TRAILING_WINDOW)?;
    let den = denominator.trailing_sum(TRAILING_WINDOW)?;
    if den == 0.0 {
        return None;
    }
    finite(num / den)
}

/// Trailing four quarter numerator over the absolute trailing four quarter
/// denominator.
///
/// Only the denominator is made positive, so an expense stored as a negative
/// number still yields a coverage ratio whose sign follows the numerator.
pub fn trailing_ratio(numerator: &AlignedSeries, denominator: &AlignedSeries) -> Option<f64> {
    let num = numerator.trailing_sum(TRAILING_WINDOW)?;
    let den = denominator.trailing_sum(TRAILING_WINDOW)?.abs();
    if den == 0.0 {
        return None;
    }
    finite(num / den)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(values: &[Option<f64>]) -> AlignedSeries {
        AlignedSeries::from_values(values.to_vec())
    }

    #[test]
    fn test_margin_uses_last_four_positions() {
        let revenue = series(&[
            Some(100.0),
            Some(105.0),
            Some(95.0),
            Some(110.0),
            Some(102.0),
            Some(108.0),
            Some(99.0),
            Some(115.0),
        ]);
        let income = series(&[
            None,
            None,
            None,
            None,
            Some(20.0),
            Some(22.0),
            Some(18.0),
            Some(21.0),
        ]);

        let margin = trailing_twelve_month_margin(&income, &revenue).unwrap();
        assert_relative_eq!(margin, 81.0 / 424.0, epsilon = 1e-12);
    }

    #[test]
    fn test_margin_needs_four_quarters() {
        let three = series(&[Some(1.0), Some(1.0), Some(1.0)]);
        let four = series(&[Some(1.0); 4]);
        assert_eq!(trailing_twelve_month_margin(&three, &four), None);
        assert_eq!(trailing_twelve_month_margin(&four, &three), None);
    }

    #[test]
    fn test_margin_rejects_gap_in_window() {
        let gappy = series(&[Some(1.0), Some(1.0), None, Some(1.0), Some(1.0)]);
        let full = series(&[Some(1.0); 5]);
        assert_eq!(trailing_twelve_month_margin(&gappy, &full), None);
        assert_eq!(trailing_twelve_month_margin(&full, &gappy), None);
    }

    #[test]
    fn test_margin_zero_denominator_sum() {
        let num = series(&[Some(1.0); 4]);
        let den = series(&[Some(5.0), Some(-5.0), Some(3.0), Some(-3.0)]);
        assert_eq!(trailing_twelve_month_margin(&num, &den), None);
    }

    #[test]
    fn test_ratio_takes_abs_of_denominator_only() {
        let income = series(&[Some(10.0), Some(10.0), Some(10.0), Some(10.0)]);
        let interest = series(&[Some(-2.0), Some(-2.0), Some(-3.0), Some(-3.0)]);
        assert_relative_eq!(trailing_ratio(&income, &interest).unwrap(), 4.0);

        let losses = series(&[Some(-10.0); 4]);
        assert_relative_eq!(trailing_ratio(&losses, &interest).unwrap(), -4.0);
    }

    #[test]
    fn test_ratio_zero_denominator_sum() {
        let num = series(&[Some(1.0); 4]);
        let den = series(&[Some(1.0), Some(-1.0), Some(1.0), Some(-1.0)]);
        assert_eq!(trailing_ratio(&num, &den), None);
    }

    #[test]
    fn test_non_finite_result_is_unavailable() {
        let huge = series(&[Some(f64::MAX); 4]);
        let tiny = series(&[Some(f64::MIN_POSITIVE); 4]);
        assert_eq!(trailing_twelve_month_margin(&huge, &tiny), None);
    }
}
