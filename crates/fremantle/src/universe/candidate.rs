//! Descriptive candidate filters.

use fremantle_data::ReitProfile;
use serde::{Deserialize, Serialize};

/// Explanation returned when no REIT survives the screen.
pub const NO_MATCH_EXPLANATION: &str = "No REITs match the selected criteria.";

/// Descriptive filters that select the candidate universe before any metric
/// is computed.
///
/// `country` and `ticker` match exactly; `property_type` matches any profile
/// whose property type label contains it, ignoring case. Unset fields match
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFilter {
    /// Country or region, exact
    pub country: Option<String>,
    /// Property type substring, case-insensitive
    pub property_type: Option<String>,
    /// Ticker, exact
    pub ticker: Option<String>,
}

fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl CandidateFilter {
    /// A filter that keeps every profile.
    pub const fn new() -> Self {
        Self {
            country: None,
            property_type: None,
            ticker: None,
        }
    }

    /// Restrict to one country. Blank values leave the filter unset.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = non_empty(country);
        self
    }

    /// Restrict to property types containing `property_type`.
    pub fn with_property_type(mut self, property_type: impl Into<String>) -> Self {
        self.property_type = non_empty(property_type);
        self
    }

    /// Restrict to one ticker. Tickers are compared upper-cased.
    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = non_empty(ticker).map(|t| t.to_uppercase());
        self
    }

    /// Whether no field is set.
    pub const fn is_empty(&self) -> bool {
        self.country.is_none() && self.property_type.is_none() && self.ticker.is_none()
    }

    /// Whether `profile` passes every set field.
    pub fn matches(&self, profile: &ReitProfile) -> bool {
        if let Some(country) = &self.country
            && profile.country_region.as_deref() != Some(country.as_str())
        {
            return false;
        }
        if let Some(wanted) = &self.property_type {
            let wanted = wanted.to_lowercase();
            let found = profile
                .property_type
                .as_deref()
                .is_some_and(|label| label.to_lowercase().contains(&wanted));
            if !found {
                return false;
            }
        }
        if let Some(ticker) = &self.ticker
            && &profile.ticker != ticker
        {
            return false;
        }
        true
    }

    /// Human readable summary of the applied filters. Unset fields read `Any`.
    pub fn explanation(&self) -> String {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "Any".to_string());
        format!(
            "Filtered REITs: Country - {}, Property Type - {}, Ticker - {}.",
            show(&self.country),
            show(&self.property_type),
            show(&self.ticker)
        )
    }
}
