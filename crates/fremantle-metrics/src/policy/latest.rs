//! Point-in-time values.

use super::finite;
use crate::series::AlignedSeries;

/// Most recent present value.
pub fn latest_value(series: &AlignedSeries) -> Option<f64> {
    series.latest()
}

/// Latest numerator over latest denominator.
///
/// Each side is located by its own backward scan, so the two values may come
/// from different quarters.
pub fn latest_ratio(numerator: &AlignedSeries, denominator: &AlignedSeries) -> Option<f64> {
    let num = numerator.latest()?;
    let den = denominator.latest()?;
    if den == 0.0 {
        return None;
    }
    finite(num / den)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_latest_value_scans_backward() {
        let s = AlignedSeries::from_values(vec![Some(1.0), Some(2.0), None, None]);
        assert_eq!(latest_value(&s), Some(2.0));
        assert_eq!(latest_value(&AlignedSeries::absent(4)), None);
        assert_eq!(latest_value(&AlignedSeries::default()), None);
    }

    #[test]
    fn test_latest_ratio_uses_independent_scans() {
        let debt = AlignedSeries::from_values(vec![Some(40.0), Some(50.0), Some(60.0)]);
        let assets = AlignedSeries::from_values(vec![Some(100.0), Some(200.0), None]);
        assert_relative_eq!(latest_ratio(&debt, &assets).unwrap(), 0.3);
    }

    #[test]
    fn test_latest_ratio_missing_side() {
        let some = AlignedSeries::from_values(vec![Some(1.0)]);
        let none = AlignedSeries::absent(1);
        assert_eq!(latest_ratio(&some, &none), None);
        assert_eq!(latest_ratio(&none, &some), None);
    }

    #[test]
    fn test_latest_ratio_zero_denominator() {
        let num = AlignedSeries::from_values(vec![Some(1.0)]);
        let den = AlignedSeries::from_values(vec![Some(0.0)]);
        assert_eq!(latest_ratio(&num, &den), None);
    }
}
