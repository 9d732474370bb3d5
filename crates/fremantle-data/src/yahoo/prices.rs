//! Latest closing prices from Yahoo Finance.

use crate::error::{DataError, Result};
use crate::types::PriceObservation;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;
use yahoo_finance_api as yahoo;

/// Days of history requested when looking for the latest close. Wide enough
/// to span long weekends and exchange holidays.
const LOOKBACK_DAYS: i64 = 14;

/// Yahoo Finance price provider with rate limiting.
pub struct YahooPriceProvider {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooPriceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooPriceProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooPriceProvider {
    /// Create a provider with the default rate limit (1 req/sec).
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(Duration::from_millis(1000))
    }

    /// Create a provider that sleeps `rate_limit_delay` after each request.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        Ok(Self {
            provider: yahoo::YahooConnector::new()?,
            rate_limit_delay,
        })
    }

    /// Configured delay between requests.
    pub const fn rate_limit_delay(&self) -> Duration {
        self.rate_limit_delay
    }

    /// Fetch the most recent daily close for `ticker`.
    pub async fn fetch_latest_close(&self, ticker: &str) -> Result<PriceObservation> {
        let ticker = validate_ticker(ticker)?;

        let end = Utc::now();
        let start = end - ChronoDuration::days(LOOKBACK_DAYS);

        let start_time = time::OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;
        let end_time = time::OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;

        let response = self
            .provider
            .get_quote_history(&ticker, start_time, end_time)
            .await;

        // Rate limit applies to failed requests too
        sleep(self.rate_limit_delay).await;

        let quotes = response?
            .quotes()
            .map_err(|e| DataError::YahooApi(e.to_string()))?;

        let latest = quotes
            .iter()
            .filter(|q| q.close.is_finite() && q.close > 0.0)
            .max_by_key(|q| q.timestamp)
            .ok_or_else(|| DataError::MissingData {
                ticker: ticker.clone(),
                reason: "No closing prices returned from Yahoo Finance".to_string(),
            })?;

        let seconds = i64::try_from(latest.timestamp)
            .map_err(|e| DataError::TimeConversion(e.to_string()))?;
        let date = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| DataError::TimeConversion(format!("Invalid timestamp {seconds}")))?
            .date_naive();

        debug!(%ticker, %date, close = latest.close, "fetched latest close");
        Ok(PriceObservation::new(ticker, date, latest.close))
    }
}

fn validate_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(DataError::InvalidTicker("Empty ticker".to_string()));
    }
    Ok(ticker.to_uppercase())
}
