//! The screening pipeline: candidates, metrics, bounds.

use crate::error::Result;
use crate::universe::{CandidateFilter, NO_MATCH_EXPLANATION, ProfileUniverse};
use fremantle_data::{FundamentalsSource, ProfileSource};
use fremantle_metrics::{FilterSet, MetricEngine, MetricRegistry};
use fremantle_output::ScreenResponse;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One screen: descriptive filters plus raw metric bound parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRequest {
    /// Descriptive filters
    pub filter: CandidateFilter,
    /// Remaining request parameters, in arrival order
    pub params: Vec<(String, String)>,
}

impl ScreenRequest {
    /// Create a request with the given descriptive filters and no bounds.
    pub const fn new(filter: CandidateFilter) -> Self {
        Self {
            filter,
            params: Vec::new(),
        }
    }

    /// Split query-string style pairs into descriptive filters and the rest.
    ///
    /// `country`, `property_type` and `ticker` set the descriptive filters,
    /// the last occurrence winning. Every other pair is kept for bound
    /// parsing, which ignores keys it does not know.
    pub fn from_query<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = Self::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "country" => request.filter = request.filter.with_country(value),
                "property_type" => request.filter = request.filter.with_property_type(value),
                "ticker" => request.filter = request.filter.with_ticker(value),
                _ => request.params.push((key.to_string(), value.to_string())),
            }
        }
        request
    }

    /// Add one raw parameter such as `("min_operating_margin", "0.2")`.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}

/// Runs screens against one data source.
#[derive(Debug)]
pub struct Screener<S> {
    source: S,
    engine: MetricEngine,
}

impl<S> Screener<S>
where
    S: FundamentalsSource + ProfileSource,
{
    /// Create a screener over `source` with a custom metric table.
    pub const fn new(source: S, registry: MetricRegistry) -> Self {
        Self {
            source,
            engine: MetricEngine::new(registry),
        }
    }

    /// Create a screener with the built-in metric table.
    pub fn standard(source: S) -> Result<Self> {
        Ok(Self::new(source, MetricRegistry::standard()?))
    }

    /// The underlying data source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// The metric engine.
    pub const fn engine(&self) -> &MetricEngine {
        &self.engine
    }

    /// The metric table.
    pub const fn registry(&self) -> &MetricRegistry {
        self.engine.registry()
    }

    /// Load the full profile universe.
    pub fn universe(&self) -> Result<ProfileUniverse> {
        Ok(ProfileUniverse::load(&self.source)?)
    }

    /// Run one screen.
    ///
    /// Bounds are parsed before anything is fetched, so a malformed bound
    /// fails fast. Rows come back in candidate order.
    pub fn screen(&self, request: &ScreenRequest) -> Result<ScreenResponse> {
        let bounds = FilterSet::from_params(
            self.registry(),
            request.params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )?;

        let candidates = self.universe()?.filter(&request.filter);
        let rows = self.engine.compute(&self.source, &candidates)?;
        let reits = bounds.apply(rows);

        info!(
            candidates = candidates.len(),
            matched = reits.len(),
            "screen complete"
        );

        let explanation = if reits.is_empty() {
            NO_MATCH_EXPLANATION.to_string()
        } else {
            request.filter.explanation()
        };
        Ok(ScreenResponse::new(explanation, reits))
    }
}
