//! Metric Registry
//!
//! The ordered metric table. It decides which line items are fetched, which
//! policy computes each output column, and which `min_`/`max_` request keys
//! filter that column. A new ratio covered by an existing policy is a new
//! table entry, not new code.

use crate::error::{ConfigError, Result};
use crate::policy::CalculationPolicy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Metric categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    /// Margins and earnings quality
    Profitability,
    /// Year-over-year growth rates
    Growth,
    /// Debt and coverage ratios
    Leverage,
    /// Distributions relative to earnings
    Dividend,
    /// Price multiples
    Valuation,
    /// Balance sheet size
    Scale,
}

impl MetricCategory {
    /// Returns all categories.
    pub const fn all() -> [Self; 6] {
        [
            Self::Profitability,
            Self::Growth,
            Self::Leverage,
            Self::Dividend,
            Self::Valuation,
            Self::Scale,
        ]
    }

    /// Snake case name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Profitability => "profitability",
            Self::Growth => "growth",
            Self::Leverage => "leverage",
            Self::Dividend => "dividend",
            Self::Valuation => "valuation",
            Self::Scale => "scale",
        }
    }

    /// Parse a category name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One configured output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDefinition {
    /// Output column name
    pub name: String,
    /// Calculation policy
    pub policy: CalculationPolicy,
    /// Source line items, numerator first
    pub line_items: Vec<String>,
    /// Prefix accepted as `min_<prefix>` / `max_<prefix>`
    pub filter_prefix: String,
    /// Display as a percentage. Presentation only.
    pub percentage: bool,
    /// Category
    pub category: MetricCategory,
    /// Brief description of what the metric measures
    pub description: String,
}

impl MetricDefinition {
    /// Create a definition. The filter prefix defaults to the name.
    pub fn new<I, S>(
        name: impl Into<String>,
        policy: CalculationPolicy,
        line_items: I,
        category: MetricCategory,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        Self {
            filter_prefix: name.clone(),
            name,
            policy,
            line_items: line_items.into_iter().map(Into::into).collect(),
            percentage: false,
            category,
            description: String::new(),
        }
    }

    /// Set the filter prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filter_prefix = prefix.into();
        self
    }

    /// Mark the metric as a percentage for display.
    pub const fn as_percentage(mut self) -> Self {
        self.percentage = true;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Request key for the lower bound.
    pub fn min_key(&self) -> String {
        format!("min_{}", self.filter_prefix)
    }

    /// Request key for the upper bound.
    pub fn max_key(&self) -> String {
        format!("max_{}", self.filter_prefix)
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        let empty = |field| ConfigError::Empty {
            metric: self.name.clone(),
            field,
        };

        if self.name.trim().is_empty() {
            return Err(empty("name"));
        }
        if self.filter_prefix.trim().is_empty() {
            return Err(empty("filter prefix"));
        }
        if self.line_items.len() != self.policy.arity() {
            return Err(ConfigError::Arity {
                metric: self.name.clone(),
                policy: self.policy.name(),
                expected: self.policy.arity(),
                actual: self.line_items.len(),
            });
        }
        if self.line_items.iter().any(|item| item.trim().is_empty()) {
            return Err(empty("line item"));
        }
        Ok(())
    }
}

/// The built-in REIT metric table.
pub fn default_metrics() -> Vec<MetricDefinition> {
    use CalculationPolicy::*;

    vec![
        // Growth
        MetricDefinition::new(
            "avg_revenue_yoy_growth",
            AverageYoyGrowth,
            ["Total Revenue"],
            MetricCategory::Growth,
        )
        .with_prefix("revenue_growth")
        .as_percentage()
        .with_description("Average year-over-year revenue growth over the last four quarters"),
        MetricDefinition::new(
            "avg_ffo_yoy_growth",
            AverageYoyGrowth,
            ["FFO"],
            MetricCategory::Growth,
        )
        .with_prefix("ffo_growth")
        .as_percentage()
        .with_description("Average year-over-year FFO growth over the last four quarters"),
        // Profitability
        MetricDefinition::new(
            "operating_margin",
            TrailingTwelveMonthMargin,
            ["Operating Income", "Total Revenue"],
            MetricCategory::Profitability,
        )
        .as_percentage()
        .with_description("TTM operating income over TTM revenue"),
        // Leverage
        MetricDefinition::new(
            "interest_coverage_ratio",
            TrailingRatio,
            ["Operating Income", "Interest Expense"],
            MetricCategory::Leverage,
        )
        .with_prefix("interest_coverage")
        .with_description("TTM operating income over the magnitude of TTM interest expense"),
        MetricDefinition::new(
            "debt_to_asset_ratio",
            LatestRatio,
            ["Total Debt", "Total Assets"],
            MetricCategory::Leverage,
        )
        .with_prefix("debt_to_asset")
        .with_description("Latest total debt over latest total assets"),
        // Dividend
        MetricDefinition::new(
            "ffo_payout_ratio",
            TrailingTwelveMonthMargin,
            ["Dividends Per Share", "FFO Per Share"],
            MetricCategory::Dividend,
        )
        .as_percentage()
        .with_description("TTM dividends per share over TTM FFO per share"),
        MetricDefinition::new(
            "payout_ratio",
            LatestRatio,
            ["Dividends Per Share", "Diluted EPS"],
            MetricCategory::Dividend,
        )
        .as_percentage()
        .with_description("Latest dividends per share over latest diluted EPS"),
        // Valuation
        MetricDefinition::new(
            "pe_ratio",
            PriceToTrailingValue,
            ["Diluted EPS"],
            MetricCategory::Valuation,
        )
        .with_description("Latest price over TTM diluted EPS"),
        MetricDefinition::new(
            "pffo_ratio",
            PriceToTrailingValue,
            ["FFO Per Share"],
            MetricCategory::Valuation,
        )
        .with_description("Latest price over TTM FFO per share"),
        // Profitability, point in time
        MetricDefinition::new(
            "ffo_to_revenue_ratio",
            LatestRatio,
            ["FFO", "Total Revenue"],
            MetricCategory::Profitability,
        )
        .with_prefix("ffo_to_revenue")
        .as_percentage()
        .with_description("Latest quarter FFO over latest quarter revenue"),
        // Scale
        MetricDefinition::new(
            "total_assets",
            LatestValue,
            ["Total Assets"],
            MetricCategory::Scale,
        )
        .with_description("Most recently reported total assets"),
    ]
}

/// Validated, ordered metric table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRegistry {
    definitions: Vec<MetricDefinition>,
}

impl MetricRegistry {
    /// Validate and wrap a metric table.
    ///
    /// Fails on a policy/line item count mismatch, a blank field, or a name
    /// or filter prefix used twice.
    pub fn new(definitions: Vec<MetricDefinition>) -> Result<Self> {
        {
            let mut names = HashSet::new();
            let mut prefixes = HashSet::new();

            for def in &definitions {
                def.validate()?;
                if !names.insert(def.name.as_str()) {
                    return Err(ConfigError::DuplicateName(def.name.clone()).into());
                }
                if !prefixes.insert(def.filter_prefix.as_str()) {
                    return Err(ConfigError::DuplicatePrefix(def.filter_prefix.clone()).into());
                }
            }
        }

        Ok(Self { definitions })
    }

    /// Registry over [`default_metrics`].
    pub fn standard() -> Result<Self> {
        Self::new(default_metrics())
    }

    /// Definitions in configuration order.
    pub fn definitions(&self) -> &[MetricDefinition] {
        &self.definitions
    }

    /// Iterate over definitions in configuration order.
    pub fn iter(&self) -> std::slice::Iter<'_, MetricDefinition> {
        self.definitions.iter()
    }

    /// Number of metrics.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Look up a metric by output name.
    pub fn get(&self, name: &str) -> Option<&MetricDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Look up a metric by filter prefix.
    pub fn by_prefix(&self, prefix: &str) -> Option<&MetricDefinition> {
        self.definitions.iter().find(|d| d.filter_prefix == prefix)
    }

    /// Metrics in a category, in configuration order.
    pub fn by_category(&self, category: MetricCategory) -> Vec<&MetricDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }

    /// Count metrics by category.
    pub fn count_by_category(&self) -> HashMap<MetricCategory, usize> {
        let mut counts = HashMap::new();
        for def in &self.definitions {
            *counts.entry(def.category).or_insert(0) += 1;
        }
        counts
    }

    /// Union of source line items, in order of first use.
    pub fn line_items(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.definitions
            .iter()
            .flat_map(|d| d.line_items.iter())
            .filter(|item| seen.insert(item.as_str()))
            .cloned()
            .collect()
    }

    /// Output column names, in configuration order.
    pub fn names(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a MetricRegistry {
    type Item = &'a MetricDefinition;
    type IntoIter = std::slice::Iter<'a, MetricDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
