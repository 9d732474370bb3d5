//! Computed output rows.

use fremantle_data::ReitProfile;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A computed metric value, absent when the data could not support it.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    /// Metric output name
    pub name: String,
    /// Value, `None` when unavailable
    pub value: Option<f64>,
}

/// One ticker's descriptive fields, latest price and every configured metric.
///
/// Metrics are held in configuration order, so every row built from the same
/// registry has the same columns in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerMetricRow {
    /// Descriptive fields
    pub profile: ReitProfile,
    /// Latest known close
    pub latest_price: Option<f64>,
    /// Metric values in configuration order
    pub metrics: Vec<MetricValue>,
}

impl TickerMetricRow {
    /// Ticker symbol.
    pub fn ticker(&self) -> &str {
        &self.profile.ticker
    }

    /// Value of metric `name`. `None` if absent or not configured.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics
            .iter()
            .find(|m| m.name == name)
            .and_then(|m| m.value)
    }

    /// Number of metrics with a value.
    pub fn available_metrics(&self) -> usize {
        self.metrics.iter().filter(|m| m.value.is_some()).count()
    }
}

/// Serialized as one flat object. Absent fields are written as `null`, never
/// omitted, so every row has the same keys.
impl Serialize for TickerMetricRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let p = &self.profile;
        let mut map = serializer.serialize_map(Some(7 + self.metrics.len()))?;
        map.serialize_entry("ticker", &p.ticker)?;
        map.serialize_entry("company_name", &p.company_name)?;
        map.serialize_entry("business_description", &p.business_description)?;
        map.serialize_entry("website", &p.website)?;
        map.serialize_entry("property_type", &p.property_type)?;
        map.serialize_entry("country_region", &p.country_region)?;
        map.serialize_entry("latest_price", &self.latest_price)?;
        for metric in &self.metrics {
            map.serialize_entry(&metric.name, &metric.value)?;
        }
        map.end()
    }
}
