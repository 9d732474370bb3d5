//! Calculation policies.
//!
//! Each policy is implemented once as a pure function over aligned series and
//! is selected by data in the metric table. Policies never fail: when the
//! inputs do not satisfy a policy's data requirements the result is `None`.

pub mod growth;
pub mod latest;
pub mod multiple;
pub mod trailing;

pub use growth::average_yoy_growth;
pub use latest::{latest_ratio, latest_value};
pub use multiple::price_to_trailing_value;
pub use trailing::{trailing_ratio, trailing_twelve_month_margin};

use crate::series::AlignedSeries;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quarters in a trailing twelve month window.
pub const TRAILING_WINDOW: usize = 4;

/// Lag, in quarters, for a year-over-year comparison.
pub const YOY_LAG: usize = 4;

/// How a metric combines its source series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationPolicy {
    /// Sum of last four numerator quarters over sum of last four denominator quarters
    TrailingTwelveMonthMargin,
    /// Like the TTM margin, but divides by the magnitude of the denominator sum
    TrailingRatio,
    /// Mean of the four most recent year-over-year growth rates
    AverageYoyGrowth,
    /// Most recent reported value
    LatestValue,
    /// Most recent numerator over most recent denominator
    LatestRatio,
    /// Latest price over the trailing four quarter sum of a per-share series
    PriceToTrailingValue,
}

impl CalculationPolicy {
    /// Returns all policies.
    pub const fn all() -> [Self; 6] {
        [
            Self::TrailingTwelveMonthMargin,
            Self::TrailingRatio,
            Self::AverageYoyGrowth,
            Self::LatestValue,
            Self::LatestRatio,
            Self::PriceToTrailingValue,
        ]
    }

    /// Number of source line items the policy consumes.
    pub const fn arity(&self) -> usize {
        match self {
            Self::TrailingTwelveMonthMargin | Self::TrailingRatio | Self::LatestRatio => 2,
            Self::AverageYoyGrowth | Self::LatestValue | Self::PriceToTrailingValue => 1,
        }
    }

    /// Whether the policy needs the ticker's latest price.
    pub const fn uses_price(&self) -> bool {
        matches!(self, Self::PriceToTrailingValue)
    }

    /// Snake case name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TrailingTwelveMonthMargin => "trailing_twelve_month_margin",
            Self::TrailingRatio => "trailing_ratio",
            Self::AverageYoyGrowth => "average_yoy_growth",
            Self::LatestValue => "latest_value",
            Self::LatestRatio => "latest_ratio",
            Self::PriceToTrailingValue => "price_to_trailing_value",
        }
    }

    /// Evaluate the policy.
    ///
    /// `series` holds the source series in configuration order. A slice of
    /// the wrong length yields `None`; the registry rejects such tables at
    /// load time so this does not occur for validated metrics.
    pub fn evaluate(&self, series: &[&AlignedSeries], price: Option<f64>) -> Option<f64> {
        match (self, series) {
            (Self::TrailingTwelveMonthMargin, [num, den]) => trailing_twelve_month_margin(num, den),
            (Self::TrailingRatio, [num, den]) => trailing_ratio(num, den),
            (Self::AverageYoyGrowth, [s]) => average_yoy_growth(s),
            (Self::LatestValue, [s]) => latest_value(s),
            (Self::LatestRatio, [num, den]) => latest_ratio(num, den),
            (Self::PriceToTrailingValue, [den]) => price_to_trailing_value(price, den),
            _ => None,
        }
    }
}

impl fmt::Display for CalculationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Keep finite results only.
pub(crate) fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CalculationPolicy::TrailingTwelveMonthMargin, 2)]
    #[case(CalculationPolicy::TrailingRatio, 2)]
    #[case(CalculationPolicy::AverageYoyGrowth, 1)]
    #[case(CalculationPolicy::LatestValue, 1)]
    #[case(CalculationPolicy::LatestRatio, 2)]
    #[case(CalculationPolicy::PriceToTrailingValue, 1)]
    fn test_arity(#[case] policy: CalculationPolicy, #[case] expected: usize) {
        assert_eq!(policy.arity(), expected);
    }

    #[test]
    fn test_wrong_series_count_is_unavailable() {
        let s = AlignedSeries::from_values(vec![Some(1.0); 8]);
        for policy in CalculationPolicy::all() {
            let wrong: Vec<&AlignedSeries> = vec![&s; 3 - policy.arity()];
            assert_eq!(policy.evaluate(&wrong, Some(10.0)), None, "{policy}");
        }
    }

    #[test]
    fn test_dispatch() {
        let s = AlignedSeries::from_values(vec![Some(2.0); 4]);
        assert_eq!(
            CalculationPolicy::LatestValue.evaluate(&[&s], None),
            Some(2.0)
        );
        assert_eq!(
            CalculationPolicy::PriceToTrailingValue.evaluate(&[&s], Some(16.0)),
            Some(2.0)
        );
    }

    #[test]
    fn test_serde_name_matches_display() {
        for policy in CalculationPolicy::all() {
            let json = serde_json::to_string(&policy).unwrap();
            assert_eq!(json, format!("\"{policy}\""));
        }
    }
}
