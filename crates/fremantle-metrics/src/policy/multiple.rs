//! Price multiples.

use super::{TRAILING_WINDOW, finite};
use crate::series::AlignedSeries;

/// Latest price over the trailing four quarter sum of a per-share series.
///
/// Requires a known price, four present trailing quarters, and a strictly
/// positive trailing sum. A loss-making trailing year has no multiple.
pub fn price_to_trailing_value(price: Option<f64>, denominator: &AlignedSeries) -> Option<f64> {
    let price = price?;
    let trailing = denominator.trailing_sum(TRAILING_WINDOW)?;
    if trailing <= 0.0 {
        return None;
    }
    finite(price / trailing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn ffo(values: &[Option<f64>]) -> AlignedSeries {
        AlignedSeries::from_values(values.to_vec())
    }

    #[test]
    fn test_price_over_trailing_sum() {
        let s = ffo(&[Some(9.0), Some(0.5), Some(0.6), Some(0.4), Some(0.5)]);
        assert_relative_eq!(price_to_trailing_value(Some(40.0), &s).unwrap(), 20.0);
    }

    #[test]
    fn test_no_price() {
        let s = ffo(&[Some(1.0); 4]);
        assert_eq!(price_to_trailing_value(None, &s), None);
    }

    #[rstest]
    #[case(&[Some(1.0), Some(1.0), Some(1.0)])]
    #[case(&[Some(1.0), None, Some(1.0), Some(1.0)])]
    #[case(&[Some(-1.0), Some(-1.0), Some(1.0), Some(1.0)])]
    #[case(&[Some(-1.0); 4])]
    fn test_unavailable_denominator(#[case] values: &[Option<f64>]) {
        assert_eq!(price_to_trailing_value(Some(10.0), &ffo(values)), None);
    }
}
