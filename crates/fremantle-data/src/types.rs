//! Row types shared between the store, the importers and the metrics engine.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Financial statement a line item was reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Income statement
    IncomeStatement,
    /// Balance sheet
    BalanceSheet,
    /// Cash flow statement
    CashFlow,
    /// REIT-specific supplemental metrics (FFO, AFFO, NOI, ...)
    IndustrySpecific,
}

impl StatementKind {
    /// Returns all statement kinds.
    pub const fn all() -> [Self; 4] {
        [
            Self::IncomeStatement,
            Self::BalanceSheet,
            Self::CashFlow,
            Self::IndustrySpecific,
        ]
    }

    /// Convert to database string representation.
    pub const fn to_db_str(&self) -> &'static str {
        match self {
            Self::IncomeStatement => "income_statement",
            Self::BalanceSheet => "balance_sheet",
            Self::CashFlow => "cash_flow",
            Self::IndustrySpecific => "industry_specific",
        }
    }

    /// Parse from database string representation.
    pub fn from_db_str(s: &str) -> Result<Self> {
        match s {
            "income_statement" => Ok(Self::IncomeStatement),
            "balance_sheet" => Ok(Self::BalanceSheet),
            "cash_flow" => Ok(Self::CashFlow),
            "industry_specific" => Ok(Self::IndustrySpecific),
            _ => Err(DataError::Parse(format!("Invalid statement kind: {}", s))),
        }
    }

    /// Parse a loosely formatted label such as `"Income Statement"` or `"cash-flow"`.
    pub fn parse_label(label: &str) -> Result<Self> {
        let normalized: String = label
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "incomestatement" | "income" | "is" => Ok(Self::IncomeStatement),
            "balancesheet" | "balance" | "bs" => Ok(Self::BalanceSheet),
            "cashflow" | "cashflowstatement" | "cf" => Ok(Self::CashFlow),
            "industryspecific" | "industrymetrics" | "industry" => Ok(Self::IndustrySpecific),
            _ => Err(DataError::Parse(format!("Unknown statement: {}", label))),
        }
    }

    /// Returns the human readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::IncomeStatement => "Income Statement",
            Self::BalanceSheet => "Balance Sheet",
            Self::CashFlow => "Cash Flow",
            Self::IndustrySpecific => "Industry Specific",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One reported financial fact in long format.
///
/// Identified by `(ticker, statement, line_item, fiscal_year, fiscal_quarter)`.
/// `fiscal_quarter` is `None` for annual-only rows, and `value` is `None` when
/// the source left the cell blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemObservation {
    /// Ticker symbol
    pub ticker: String,
    /// Statement the line item belongs to
    pub statement: StatementKind,
    /// Canonical line item name, whitespace-trimmed
    pub line_item: String,
    /// Fiscal year
    pub fiscal_year: i32,
    /// Fiscal quarter (1-4), `None` for annual rows
    pub fiscal_quarter: Option<i32>,
    /// Reported value
    pub value: Option<f64>,
}

impl LineItemObservation {
    /// Create a new observation. The ticker is upper-cased and the line item trimmed.
    pub fn new(
        ticker: impl Into<String>,
        statement: StatementKind,
        line_item: impl AsRef<str>,
        fiscal_year: i32,
        fiscal_quarter: Option<i32>,
        value: Option<f64>,
    ) -> Self {
        Self {
            ticker: ticker.into().trim().to_uppercase(),
            statement,
            line_item: line_item.as_ref().trim().to_string(),
            fiscal_year,
            fiscal_quarter,
            value,
        }
    }

    /// Shorthand for a quarterly row.
    pub fn quarterly(
        ticker: impl Into<String>,
        statement: StatementKind,
        line_item: impl AsRef<str>,
        fiscal_year: i32,
        fiscal_quarter: i32,
        value: Option<f64>,
    ) -> Self {
        Self::new(
            ticker,
            statement,
            line_item,
            fiscal_year,
            Some(fiscal_quarter),
            value,
        )
    }
}

/// Daily closing price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Ticker symbol
    pub ticker: String,
    /// Trading date
    pub date: NaiveDate,
    /// Closing price
    pub close_price: f64,
}

impl PriceObservation {
    /// Create a new price observation.
    pub fn new(ticker: impl Into<String>, date: NaiveDate, close_price: f64) -> Self {
        Self {
            ticker: ticker.into().trim().to_uppercase(),
            date,
            close_price,
        }
    }
}

/// Descriptive business fields for a REIT or crowdfunding vehicle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReitProfile {
    /// Ticker symbol
    pub ticker: String,
    /// Company name
    pub company_name: Option<String>,
    /// Business description
    pub business_description: Option<String>,
    /// Company website
    pub website: Option<String>,
    /// Property type label, possibly a comma separated list
    pub property_type: Option<String>,
    /// Country or region of listing
    pub country_region: Option<String>,
}

impl ReitProfile {
    /// Create a profile with only a ticker set.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into().trim().to_uppercase(),
            ..Self::default()
        }
    }

    /// Set the company name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    /// Set the property type label.
    pub fn with_property_type(mut self, property_type: impl Into<String>) -> Self {
        self.property_type = Some(property_type.into());
        self
    }

    /// Set the country or region.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country_region = Some(country.into());
        self
    }
}
