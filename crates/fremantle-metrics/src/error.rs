//! Error types for metric configuration and evaluation.

use fremantle_data::DataError;
use thiserror::Error;

/// Result type for metric operations.
pub type Result<T> = std::result::Result<T, MetricError>;

/// Errors raised by the metrics engine.
///
/// Insufficient data is never represented here; it resolves to an absent
/// metric value instead.
#[derive(Debug, Error)]
pub enum MetricError {
    /// The metric table is invalid
    #[error("Invalid metric configuration: {0}")]
    Config(#[from] ConfigError),

    /// A filter bound could not be parsed
    #[error("Invalid bound for {key}: {value:?}")]
    InvalidBound {
        /// Request parameter name
        key: String,
        /// Raw parameter value
        value: String,
    },

    /// The data source failed
    #[error(transparent)]
    Data(#[from] DataError),
}

/// Problems detected when a metric table is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Policy given the wrong number of line items
    #[error("metric {metric}: {policy} takes {expected} line item(s), got {actual}")]
    Arity {
        /// Metric name
        metric: String,
        /// Policy name
        policy: &'static str,
        /// Line items the policy consumes
        expected: usize,
        /// Line items configured
        actual: usize,
    },

    /// Two metrics share a name
    #[error("duplicate metric name: {0}")]
    DuplicateName(String),

    /// Two metrics share a filter prefix
    #[error("duplicate filter prefix: {0}")]
    DuplicatePrefix(String),

    /// A metric name, prefix or line item is blank
    #[error("metric {metric}: {field} is empty")]
    Empty {
        /// Metric name (may itself be blank)
        metric: String,
        /// Offending field
        field: &'static str,
    },
}
