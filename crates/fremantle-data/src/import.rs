//! CSV importers for seeding the store.
//!
//! Line items are read in long format:
//!
//! ```text
//! ticker,statement,line_item,fiscal_year,fiscal_quarter,value
//! ESS,Income Statement,Total Revenue,2024,1,"437,120"
//! ESS,Industry Specific,FFO Per Share,2023,,15.79
//! ```
//!
//! An empty quarter marks an annual row. Placeholder values (`-`, blank,
//! `NaN`) and anything that does not parse as a number are stored as absent.
//! Rows without a usable ticker, line item, statement or fiscal year are
//! skipped and counted.

use crate::error::Result;
use crate::types::{LineItemObservation, PriceObservation, ReitProfile, StatementKind};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Records parsed from one CSV source plus the number of rejected rows.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBatch<T> {
    /// Accepted records, in file order
    pub records: Vec<T>,
    /// Rows that could not be used
    pub skipped: usize,
}

impl<T> ImportBatch<T> {
    const fn new() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LineItemRecord {
    ticker: String,
    statement: String,
    line_item: String,
    fiscal_year: String,
    #[serde(default)]
    fiscal_quarter: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceRecord {
    ticker: String,
    date: String,
    close_price: String,
}

#[derive(Debug, Deserialize)]
struct ProfileRecord {
    #[serde(alias = "Ticker")]
    ticker: String,
    #[serde(default, alias = "Company_Name")]
    company_name: Option<String>,
    #[serde(default, alias = "Business_Description")]
    business_description: Option<String>,
    #[serde(default, alias = "Website")]
    website: Option<String>,
    #[serde(default, alias = "Property_Type")]
    property_type: Option<String>,
    #[serde(default, alias = "Country_Region")]
    country_region: Option<String>,
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(input)
}

/// Parse a numeric cell, treating placeholders as absent.
pub fn parse_value(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    match cleaned.as_str() {
        "" | "-" | "--" | "NA" | "N/A" => None,
        s => s.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

/// Parse a fiscal quarter cell such as `"2"` or `"Q2"`.
///
/// `Ok(None)` is an annual row; `Err(())` is a cell that names no quarter.
fn parse_quarter(raw: Option<&str>) -> std::result::Result<Option<i32>, ()> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let digits = raw.trim_start_matches(['Q', 'q']);
    digits.parse::<i32>().map(Some).map_err(|_| ())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Read long-format line items from any reader.
pub fn read_line_items<R: Read>(input: R) -> Result<ImportBatch<LineItemObservation>> {
    let mut batch = ImportBatch::new();

    for (line, record) in reader(input).deserialize::<LineItemRecord>().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!(line = line + 2, error = %e, "skipping malformed line item row");
                batch.skipped += 1;
                continue;
            }
        };

        if record.ticker.is_empty() || record.line_item.is_empty() {
            warn!(line = line + 2, "skipping line item row without ticker or name");
            batch.skipped += 1;
            continue;
        }

        let Ok(statement) = StatementKind::parse_label(&record.statement) else {
            warn!(line = line + 2, statement = %record.statement, "skipping row with unknown statement");
            batch.skipped += 1;
            continue;
        };

        let Ok(fiscal_year) = record.fiscal_year.parse::<i32>() else {
            warn!(line = line + 2, fiscal_year = %record.fiscal_year, "skipping row without fiscal year");
            batch.skipped += 1;
            continue;
        };

        let Ok(fiscal_quarter) = parse_quarter(record.fiscal_quarter.as_deref()) else {
            warn!(line = line + 2, "skipping row with unparseable fiscal quarter");
            batch.skipped += 1;
            continue;
        };

        let value = record.value.as_deref().and_then(parse_value);
        if value.is_none() {
            debug!(line = line + 2, ticker = %record.ticker, "storing absent value");
        }

        batch.records.push(LineItemObservation::new(
            record.ticker,
            statement,
            record.line_item,
            fiscal_year,
            fiscal_quarter,
            value,
        ));
    }

    info!(
        records = batch.records.len(),
        skipped = batch.skipped,
        "read line items"
    );
    Ok(batch)
}

/// Read closing prices (`ticker,date,close_price`) from any reader.
pub fn read_prices<R: Read>(input: R) -> Result<ImportBatch<PriceObservation>> {
    let mut batch = ImportBatch::new();

    for (line, record) in reader(input).deserialize::<PriceRecord>().enumerate() {
        let parsed = record.ok().and_then(|r| {
            let date = NaiveDate::parse_from_str(&r.date, "%Y-%m-%d").ok()?;
            let close = parse_value(&r.close_price).filter(|c| *c > 0.0)?;
            (!r.ticker.is_empty()).then(|| PriceObservation::new(r.ticker, date, close))
        });

        match parsed {
            Some(price) => batch.records.push(price),
            None => {
                warn!(line = line + 2, "skipping malformed price row");
                batch.skipped += 1;
            }
        }
    }

    info!(
        records = batch.records.len(),
        skipped = batch.skipped,
        "read prices"
    );
    Ok(batch)
}

/// Read REIT profiles from any reader.
///
/// Accepts both snake_case headers and the `Company_Name` style used by the
/// business data export.
pub fn read_profiles<R: Read>(input: R) -> Result<ImportBatch<ReitProfile>> {
    let mut batch = ImportBatch::new();

    for (line, record) in reader(input).deserialize::<ProfileRecord>().enumerate() {
        match record {
            Ok(r) if !r.ticker.is_empty() => batch.records.push(ReitProfile {
                ticker: r.ticker.to_uppercase(),
                company_name: non_empty(r.company_name),
                business_description: non_empty(r.business_description),
                website: non_empty(r.website),
                property_type: non_empty(r.property_type),
                country_region: non_empty(r.country_region),
            }),
            _ => {
                warn!(line = line + 2, "skipping malformed profile row");
                batch.skipped += 1;
            }
        }
    }

    info!(
        records = batch.records.len(),
        skipped = batch.skipped,
        "read profiles"
    );
    Ok(batch)
}

/// Read line items from a CSV file.
pub fn read_line_items_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<ImportBatch<LineItemObservation>> {
    read_line_items(File::open(path)?)
}

/// Read prices from a CSV file.
pub fn read_prices_from_path<P: AsRef<Path>>(path: P) -> Result<ImportBatch<PriceObservation>> {
    read_prices(File::open(path)?)
}

/// Read profiles from a CSV file.
pub fn read_profiles_from_path<P: AsRef<Path>>(path: P) -> Result<ImportBatch<ReitProfile>> {
    read_profiles(File::open(path)?)
}
