//! Error types for screening.

use fremantle_data::DataError;
use fremantle_metrics::MetricError;
use thiserror::Error;

/// Result type for screening.
pub type Result<T> = std::result::Result<T, ScreenError>;

/// Errors that can occur while running a screen.
#[derive(Debug, Error)]
pub enum ScreenError {
    /// Metric configuration, bound parsing or metric input failure
    #[error(transparent)]
    Metric(#[from] MetricError),

    /// Profile loading failure
    #[error(transparent)]
    Data(#[from] DataError),
}

impl ScreenError {
    /// Whether the error was caused by the request rather than the data or
    /// configuration.
    pub const fn is_bad_request(&self) -> bool {
        matches!(self, Self::Metric(MetricError::InvalidBound { .. }))
    }
}
