//! Per-ticker grouping of fetched statement rows.
//!
//! This is the single point where raw rows enter the metric core. Two
//! cleaning rules apply here and nowhere else: a reported zero becomes an
//! absent value, and rows without a valid quarterly period are dropped.

use crate::period::{PeriodIndex, QuarterPeriod};
use fremantle_data::LineItemObservation;
use std::collections::HashMap;
use tracing::trace;

/// Clean a reported value: zero and non-finite values become absent.
pub fn clean_value(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

/// Cleaned quarterly rows for one ticker, grouped by line item.
///
/// Rows keep their fetch order within each line item so that later rows win
/// when the same period is reported twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerObservations {
    by_line_item: HashMap<String, Vec<(QuarterPeriod, Option<f64>)>>,
}

impl TickerObservations {
    /// Add one row. Returns `false` if the row has no valid quarterly period,
    /// including a fiscal year outside [`FISCAL_YEARS`](crate::FISCAL_YEARS).
    pub fn push(&mut self, row: &LineItemObservation) -> bool {
        let Some(period) = QuarterPeriod::from_parts(row.fiscal_year, row.fiscal_quarter) else {
            return false;
        };
        self.by_line_item
            .entry(row.line_item.trim().to_string())
            .or_default()
            .push((period, clean_value(row.value)));
        true
    }

    /// Rows for `line_item` in fetch order.
    pub fn line_item(&self, line_item: &str) -> &[(QuarterPeriod, Option<f64>)] {
        self.by_line_item
            .get(line_item)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Gap-free index over every period observed for any line item.
    pub fn period_index(&self) -> PeriodIndex {
        PeriodIndex::from_periods(
            self.by_line_item
                .values()
                .flat_map(|rows| rows.iter().map(|(period, _)| *period)),
        )
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.by_line_item.values().map(Vec::len).sum()
    }

    /// Whether no rows were stored.
    pub fn is_empty(&self) -> bool {
        self.by_line_item.is_empty()
    }
}

/// Cleaned rows for a batch of tickers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSet {
    by_ticker: HashMap<String, TickerObservations>,
    dropped: usize,
}

impl ObservationSet {
    /// Group fetched rows by ticker, applying the cleaning rules.
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a LineItemObservation>,
    {
        let mut set = Self::default();
        for row in rows {
            let accepted = set
                .by_ticker
                .entry(row.ticker.clone())
                .or_default()
                .push(row);
            if !accepted {
                trace!(
                    ticker = %row.ticker,
                    line_item = %row.line_item,
                    fiscal_year = row.fiscal_year,
                    fiscal_quarter = ?row.fiscal_quarter,
                    "row has no valid quarterly period"
                );
                set.dropped += 1;
            }
        }
        set
    }

    /// Rows for `ticker`, if any were fetched.
    pub fn ticker(&self, ticker: &str) -> Option<&TickerObservations> {
        self.by_ticker.get(ticker)
    }

    /// Number of tickers with at least one fetched row.
    pub fn ticker_count(&self) -> usize {
        self.by_ticker.len()
    }

    /// Rows dropped for lacking a valid quarterly period.
    pub const fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fremantle_data::StatementKind;
    use rstest::rstest;

    fn row(ticker: &str, item: &str, year: i32, quarter: Option<i32>, value: Option<f64>) -> LineItemObservation {
        LineItemObservation::new(
            ticker,
            StatementKind::IncomeStatement,
            item,
            year,
            quarter,
            value,
        )
    }

    #[rstest]
    #[case(Some(0.0), None)]
    #[case(Some(-0.0), None)]
    #[case(Some(f64::NAN), None)]
    #[case(Some(f64::INFINITY), None)]
    #[case(None, None)]
    #[case(Some(-3.5), Some(-3.5))]
    fn test_clean_value(#[case] raw: Option<f64>, #[case] expected: Option<f64>) {
        assert_eq!(clean_value(raw), expected);
    }

    #[test]
    fn test_grouping_and_cleaning() {
        let rows = vec![
            row("ABC", "Total Revenue", 2024, Some(1), Some(100.0)),
            row("ABC", "Total Revenue", 2024, Some(2), Some(0.0)),
            row("ABC", "Total Revenue", 2023, None, Some(400.0)),
            row("ABC", "FFO", 2024, Some(9), Some(5.0)),
            row("XYZ", "FFO", 2023, Some(4), Some(7.0)),
        ];

        let set = ObservationSet::from_rows(&rows);
        assert_eq!(set.ticker_count(), 2);
        assert_eq!(set.dropped(), 2);

        let abc = set.ticker("ABC").unwrap();
        assert_eq!(abc.len(), 2);
        let revenue = abc.line_item("Total Revenue");
        assert_eq!(revenue[0].1, Some(100.0));
        assert_eq!(revenue[1].1, None);
        assert!(abc.line_item("FFO").is_empty());
        assert!(set.ticker("NOPE").is_none());
    }

    #[test]
    fn test_period_index_spans_all_line_items() {
        let rows = vec![
            row("ABC", "Total Revenue", 2023, Some(2), Some(1.0)),
            row("ABC", "FFO", 2024, Some(1), Some(1.0)),
        ];
        let set = ObservationSet::from_rows(&rows);
        let index = set.ticker("ABC").unwrap().period_index();
        assert_eq!(index.len(), 4);
        assert_eq!(index.first(), QuarterPeriod::new(2023, 2));
        assert_eq!(index.last(), QuarterPeriod::new(2024, 1));
    }

    #[test]
    fn test_outlier_year_is_dropped() {
        let mut rows: Vec<_> = (1..=4)
            .map(|q| row("ABC", "Total Revenue", 2024, Some(q), Some(100.0)))
            .collect();
        rows.push(row("ABC", "Total Revenue", 200_000_000, Some(1), Some(100.0)));
        rows.push(row("ABC", "Operating Income", -5, Some(2), Some(20.0)));

        let set = ObservationSet::from_rows(&rows);
        assert_eq!(set.dropped(), 2);

        let abc = set.ticker("ABC").unwrap();
        let index = abc.period_index();
        assert_eq!(index.len(), 4);
        assert_eq!(index.first(), QuarterPeriod::new(2024, 1));
        assert_eq!(index.last(), QuarterPeriod::new(2024, 4));
        assert!(abc.line_item("Operating Income").is_empty());
    }

    #[test]
    fn test_ticker_with_only_annual_rows_has_empty_index() {
        let rows = vec![row("ABC", "Total Assets", 2023, None, Some(1.0))];
        let set = ObservationSet::from_rows(&rows);
        let abc = set.ticker("ABC").unwrap();
        assert!(abc.is_empty());
        assert!(abc.period_index().is_empty());
    }
}
