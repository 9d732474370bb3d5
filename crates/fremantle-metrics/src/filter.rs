//! Metric bound filtering.
//!
//! Bounds arrive as `min_<prefix>` / `max_<prefix>` request parameters keyed
//! by each metric's filter prefix. A row passes when every bounded metric is
//! present and inside its bounds; an absent value never passes.

use crate::error::{MetricError, Result};
use crate::registry::MetricRegistry;
use crate::row::TickerMetricRow;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inclusive bounds for one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricBounds {
    /// Lower bound, inclusive
    pub min: Option<f64>,
    /// Upper bound, inclusive
    pub max: Option<f64>,
}

impl MetricBounds {
    /// Whether neither bound is set.
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether `value` satisfies the bounds.
    ///
    /// With no bound set anything passes, including an absent value. With a
    /// bound set an absent value fails.
    pub fn contains(&self, value: Option<f64>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(v) = value else {
            return false;
        };
        self.min.is_none_or(|min| v >= min) && self.max.is_none_or(|max| v <= max)
    }
}

/// Bounds for a set of metrics, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    bounds: Vec<(String, MetricBounds)>,
}

impl FilterSet {
    /// A filter that keeps every row.
    pub const fn new() -> Self {
        Self { bounds: Vec::new() }
    }

    /// Parse `min_<prefix>` / `max_<prefix>` parameters.
    ///
    /// Keys that do not name a configured prefix are ignored, as are empty
    /// values. A value that is not a finite number is an error. When a key
    /// repeats, the last value wins.
    pub fn from_params<I, K, V>(registry: &MetricRegistry, params: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filters = Self::new();

        for (key, value) in params {
            let (key, raw) = (key.as_ref(), value.as_ref().trim());
            let (is_min, prefix) = if let Some(prefix) = key.strip_prefix("min_") {
                (true, prefix)
            } else if let Some(prefix) = key.strip_prefix("max_") {
                (false, prefix)
            } else {
                continue;
            };

            let Some(def) = registry.by_prefix(prefix) else {
                continue;
            };
            if raw.is_empty() {
                continue;
            }

            let bound = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| MetricError::InvalidBound {
                    key: key.to_string(),
                    value: raw.to_string(),
                })?;

            filters = if is_min {
                filters.with_min(&def.name, bound)
            } else {
                filters.with_max(&def.name, bound)
            };
        }

        Ok(filters)
    }

    fn entry(&mut self, metric: &str) -> &mut MetricBounds {
        let pos = match self.bounds.iter().position(|(name, _)| name == metric) {
            Some(pos) => pos,
            None => {
                self.bounds.push((metric.to_string(), MetricBounds::default()));
                self.bounds.len() - 1
            }
        };
        &mut self.bounds[pos].1
    }

    /// Set the lower bound for metric `name`.
    pub fn with_min(mut self, metric: &str, min: f64) -> Self {
        self.entry(metric).min = Some(min);
        self
    }

    /// Set the upper bound for metric `name`.
    pub fn with_max(mut self, metric: &str, max: f64) -> Self {
        self.entry(metric).max = Some(max);
        self
    }

    /// Bounds for metric `name`, if any were set.
    pub fn bounds(&self, metric: &str) -> Option<&MetricBounds> {
        self.bounds
            .iter()
            .find(|(name, _)| name == metric)
            .map(|(_, b)| b)
    }

    /// Iterate over `(metric, bounds)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricBounds)> {
        self.bounds.iter().map(|(name, b)| (name.as_str(), b))
    }

    /// Whether no metric is bounded.
    pub fn is_empty(&self) -> bool {
        self.bounds.iter().all(|(_, b)| b.is_unbounded())
    }

    /// Whether `row` satisfies every bound.
    pub fn matches(&self, row: &TickerMetricRow) -> bool {
        self.bounds
            .iter()
            .all(|(name, bounds)| bounds.contains(row.metric(name)))
    }

    /// Keep the rows that satisfy every bound, preserving order.
    pub fn apply(&self, rows: Vec<TickerMetricRow>) -> Vec<TickerMetricRow> {
        if self.is_empty() {
            return rows;
        }
        let before = rows.len();
        let kept: Vec<_> = rows.into_iter().filter(|row| self.matches(row)).collect();
        debug!(before, after = kept.len(), "applied metric bounds");
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::MetricValue;
    use fremantle_data::ReitProfile;
    use rstest::rstest;

    fn registry() -> MetricRegistry {
        MetricRegistry::standard().unwrap()
    }

    fn row(ticker: &str, margin: Option<f64>, growth: Option<f64>) -> TickerMetricRow {
        TickerMetricRow {
            profile: ReitProfile::new(ticker),
            latest_price: None,
            metrics: vec![
                MetricValue {
                    name: "operating_margin".into(),
                    value: margin,
                },
                MetricValue {
                    name: "avg_revenue_yoy_growth".into(),
                    value: growth,
                },
            ],
        }
    }

    #[rstest]
    #[case(Some(0.1), Some(0.3), Some(0.2), true)]
    #[case(Some(0.1), Some(0.3), Some(0.1), true)]
    #[case(Some(0.1), Some(0.3), Some(0.3), true)]
    #[case(Some(0.1), Some(0.3), Some(0.31), false)]
    #[case(Some(0.1), None, Some(0.05), false)]
    #[case(None, Some(0.3), Some(-5.0), true)]
    #[case(Some(0.1), Some(0.3), None, false)]
    #[case(None, None, None, true)]
    #[case(Some(0.5), Some(0.1), Some(0.3), false)]
    fn test_bounds_contains(
        #[case] min: Option<f64>,
        #[case] max: Option<f64>,
        #[case] value: Option<f64>,
        #[case] expected: bool,
    ) {
        assert_eq!(MetricBounds { min, max }.contains(value), expected);
    }

    #[test]
    fn test_from_params() {
        let params = [
            ("min_operating_margin", "0.1"),
            ("max_operating_margin", " 0.5 "),
            ("min_revenue_growth", ""),
            ("country", "United States"),
            ("min_unknown_metric", "abc"),
        ];
        let filters = FilterSet::from_params(&registry(), params).unwrap();

        let margin = filters.bounds("operating_margin").unwrap();
        assert_eq!(margin.min, Some(0.1));
        assert_eq!(margin.max, Some(0.5));
        assert!(filters.bounds("avg_revenue_yoy_growth").is_none());
        assert_eq!(filters.iter().count(), 1);
    }

    #[test]
    fn test_repeated_key_keeps_last_value() {
        let params = [
            ("min_operating_margin", "0.1"),
            ("max_operating_margin", "0.4"),
            ("min_operating_margin", "0.2"),
        ];
        let filters = FilterSet::from_params(&registry(), params).unwrap();
        assert_eq!(filters.iter().count(), 1);

        let margin = filters.bounds("operating_margin").unwrap();
        assert_eq!(margin.min, Some(0.2));
        assert_eq!(margin.max, Some(0.4));

        let rows = vec![row("AAA", Some(0.15), None), row("BBB", Some(0.25), None)];
        let kept: Vec<_> = filters
            .apply(rows)
            .into_iter()
            .map(|r| r.profile.ticker)
            .collect();
        assert_eq!(kept, ["BBB"]);
    }

    #[rstest]
    #[case("abc")]
    #[case("NaN")]
    #[case("inf")]
    fn test_from_params_rejects_non_numeric(#[case] raw: &str) {
        let err = FilterSet::from_params(&registry(), [("min_operating_margin", raw)]).unwrap_err();
        assert!(matches!(err, MetricError::InvalidBound { key, .. } if key == "min_operating_margin"));
    }

    #[test]
    fn test_apply_excludes_absent_and_combines_with_and() {
        let rows = vec![
            row("AAA", Some(0.2), Some(0.05)),
            row("BBB", Some(0.2), None),
            row("CCC", None, Some(0.05)),
            row("DDD", Some(0.05), Some(0.05)),
        ];
        let filters = FilterSet::new()
            .with_min("operating_margin", 0.1)
            .with_max("operating_margin", 0.3)
            .with_min("avg_revenue_yoy_growth", 0.0);

        let kept: Vec<_> = filters
            .apply(rows)
            .into_iter()
            .map(|r| r.profile.ticker)
            .collect();
        assert_eq!(kept, ["AAA"]);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let rows = vec![row("AAA", None, None), row("BBB", Some(1.0), None)];
        let filters = FilterSet::from_params(&registry(), Vec::<(String, String)>::new()).unwrap();
        assert!(filters.is_empty());
        assert_eq!(filters.apply(rows).len(), 2);
    }
}
