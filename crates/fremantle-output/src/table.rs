//! Wide-table views of computed rows.

use crate::export::ExportError;
use fremantle_metrics::TickerMetricRow;
use polars::prelude::*;
use serde::Serialize;

/// Build a DataFrame with one row per ticker and one nullable `f64` column
/// per metric.
///
/// Columns: `ticker`, `company_name`, `property_type`, `country_region`,
/// `latest_price`, then the metrics in the first row's order.
pub fn to_dataframe(rows: &[TickerMetricRow]) -> Result<DataFrame, ExportError> {
    let tickers: Vec<&str> = rows.iter().map(|r| r.profile.ticker.as_str()).collect();
    let names: Vec<Option<&str>> = rows
        .iter()
        .map(|r| r.profile.company_name.as_deref())
        .collect();
    let property_types: Vec<Option<&str>> = rows
        .iter()
        .map(|r| r.profile.property_type.as_deref())
        .collect();
    let countries: Vec<Option<&str>> = rows
        .iter()
        .map(|r| r.profile.country_region.as_deref())
        .collect();
    let prices: Vec<Option<f64>> = rows.iter().map(|r| r.latest_price).collect();

    let mut columns: Vec<Column> = vec![
        Series::new("ticker".into(), tickers).into(),
        Series::new("company_name".into(), names).into(),
        Series::new("property_type".into(), property_types).into(),
        Series::new("country_region".into(), countries).into(),
        Series::new("latest_price".into(), prices).into(),
    ];

    if let Some(first) = rows.first() {
        for metric in &first.metrics {
            let values: Vec<Option<f64>> = rows.iter().map(|r| r.metric(&metric.name)).collect();
            columns.push(Series::new(metric.name.as_str().into(), values).into());
        }
    }

    Ok(DataFrame::new(columns)?)
}

/// Coverage and range of one metric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    /// Metric name
    pub name: String,
    /// Rows with a value
    pub available: usize,
    /// Rows in the table
    pub total: usize,
    /// Smallest value
    pub min: Option<f64>,
    /// Largest value
    pub max: Option<f64>,
    /// Mean value
    pub mean: Option<f64>,
    /// Median value
    pub median: Option<f64>,
}

impl MetricSummary {
    /// Share of rows with a value, in `[0, 1]`.
    pub fn coverage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.available as f64 / self.total as f64
        }
    }
}

/// Summarize every metric column of `rows`.
pub fn summarize(rows: &[TickerMetricRow]) -> Result<Vec<MetricSummary>, ExportError> {
    let df = to_dataframe(rows)?;
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };

    first
        .metrics
        .iter()
        .map(|metric| -> Result<MetricSummary, ExportError> {
            let series = df.column(&metric.name)?.as_materialized_series();
            Ok(MetricSummary {
                name: metric.name.clone(),
                available: series.len() - series.null_count(),
                total: series.len(),
                min: series.min::<f64>()?,
                max: series.max::<f64>()?,
                mean: series.mean(),
                median: series.median(),
            })
        })
        .collect()
}
