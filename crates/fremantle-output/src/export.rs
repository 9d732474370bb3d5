//! CSV and JSON export of screen results.

use fremantle_metrics::TickerMetricRow;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// DataFrame construction error.
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Writer produced invalid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" | "pretty" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Descriptive columns written before the metric columns.
pub const BASE_COLUMNS: [&str; 7] = [
    "ticker",
    "company_name",
    "business_description",
    "website",
    "property_type",
    "country_region",
    "latest_price",
];

/// Result of a screen: a description of the applied descriptive filters and
/// the matching rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenResponse {
    /// Human readable summary of the descriptive filters
    pub explanation: String,
    /// Matching rows, in candidate order
    pub reits: Vec<TickerMetricRow>,
}

impl ScreenResponse {
    /// Create a new response.
    pub const fn new(explanation: String, reits: Vec<TickerMetricRow>) -> Self {
        Self { explanation, reits }
    }

    /// Number of matching rows.
    pub fn len(&self) -> usize {
        self.reits.len()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.reits.is_empty()
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write rows as CSV. Metric columns follow the first row's configuration
/// order; absent values are empty cells.
fn rows_to_csv(rows: &[TickerMetricRow]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let metric_names: Vec<&str> = rows
        .first()
        .map(|r| r.metrics.iter().map(|m| m.name.as_str()).collect())
        .unwrap_or_default();
    wtr.write_record(BASE_COLUMNS.iter().copied().chain(metric_names.iter().copied()))?;

    for row in rows {
        let p = &row.profile;
        let mut record = vec![
            p.ticker.clone(),
            p.company_name.clone().unwrap_or_default(),
            p.business_description.clone().unwrap_or_default(),
            p.website.clone().unwrap_or_default(),
            p.property_type.clone().unwrap_or_default(),
            p.country_region.clone().unwrap_or_default(),
            cell(row.latest_price),
        ];
        record.extend(metric_names.iter().map(|name| cell(row.metric(name))));
        wtr.write_record(&record)?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

impl Exporter for [TickerMetricRow] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => rows_to_csv(self),
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for Vec<TickerMetricRow> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        self.as_slice().export_to_string(format)
    }
}

impl Exporter for ScreenResponse {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut output = String::new();
                for line in self.explanation.lines() {
                    output.push_str(&format!("# {}\n", line));
                }
                output.push_str(&rows_to_csv(&self.reits)?);
                Ok(output)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}
