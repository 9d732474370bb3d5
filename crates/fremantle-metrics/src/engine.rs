//! Cross-ticker metric computation.

use crate::error::Result;
use crate::observations::{ObservationSet, TickerObservations};
use crate::registry::MetricRegistry;
use crate::row::{MetricValue, TickerMetricRow};
use crate::series::{AlignedSeries, SeriesResolver};
use fremantle_data::{FundamentalsSource, ReitProfile};
use std::rc::Rc;
use tracing::{debug, info};

/// Computes every configured metric for a candidate universe.
///
/// A pass makes exactly one batched line item fetch and one batched price
/// fetch regardless of how many candidates there are.
#[derive(Debug, Clone)]
pub struct MetricEngine {
    registry: MetricRegistry,
}

impl MetricEngine {
    /// Create an engine over a validated registry.
    pub const fn new(registry: MetricRegistry) -> Self {
        Self { registry }
    }

    /// The metric table driving this engine.
    pub const fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    /// Compute one row per candidate, in candidate order.
    ///
    /// Candidates with no statement rows still produce a row with every
    /// metric absent. Only a data source failure returns an error.
    pub fn compute<S>(&self, source: &S, candidates: &[ReitProfile]) -> Result<Vec<TickerMetricRow>>
    where
        S: FundamentalsSource + ?Sized,
    {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let tickers: Vec<String> = candidates.iter().map(|c| c.ticker.clone()).collect();
        let line_items = self.registry.line_items();

        let rows = source.fetch_line_items(&tickers, &line_items)?;
        let prices = source.fetch_latest_prices(&tickers)?;
        let observations = ObservationSet::from_rows(&rows);

        debug!(
            tickers = tickers.len(),
            rows = rows.len(),
            dropped = observations.dropped(),
            prices = prices.len(),
            "fetched metric inputs"
        );

        let results: Vec<TickerMetricRow> = candidates
            .iter()
            .map(|profile| {
                let latest_price = prices.get(&profile.ticker).copied();
                TickerMetricRow {
                    profile: profile.clone(),
                    latest_price,
                    metrics: self.compute_ticker(observations.ticker(&profile.ticker), latest_price),
                }
            })
            .collect();

        info!(
            candidates = results.len(),
            with_data = observations.ticker_count(),
            "computed metrics"
        );
        Ok(results)
    }

    /// Evaluate every metric for one ticker's cleaned rows.
    pub fn compute_ticker(
        &self,
        observations: Option<&TickerObservations>,
        latest_price: Option<f64>,
    ) -> Vec<MetricValue> {
        let mut resolver = SeriesResolver::new(observations);

        let metrics: Vec<MetricValue> = self
            .registry
            .iter()
            .map(|def| {
                let series: Vec<Rc<AlignedSeries>> = def
                    .line_items
                    .iter()
                    .map(|item| resolver.series(item))
                    .collect();
                let refs: Vec<&AlignedSeries> = series.iter().map(|s| &**s).collect();
                MetricValue {
                    name: def.name.clone(),
                    value: def.policy.evaluate(&refs, latest_price),
                }
            })
            .collect();

        debug!(
            periods = resolver.index().len(),
            series = resolver.cached(),
            available = metrics.iter().filter(|m| m.value.is_some()).count(),
            "computed ticker metrics"
        );
        metrics
    }
}
