//! Read interfaces consumed by the metrics engine.
//!
//! Both capabilities are batched by ticker set: implementations must answer a
//! whole candidate universe in a bounded number of round trips rather than one
//! query per ticker.

use crate::error::Result;
use crate::types::{LineItemObservation, ReitProfile};
use std::collections::HashMap;

/// Batched access to statement rows and latest prices.
pub trait FundamentalsSource {
    /// Fetch every observation whose ticker is in `tickers` and whose line
    /// item is in `line_items`.
    ///
    /// Within one ticker, rows are returned in the order they were written so
    /// that callers can apply keep-last de-duplication.
    fn fetch_line_items(
        &self,
        tickers: &[String],
        line_items: &[String],
    ) -> Result<Vec<LineItemObservation>>;

    /// Fetch the most recent closing price for each ticker that has one.
    fn fetch_latest_prices(&self, tickers: &[String]) -> Result<HashMap<String, f64>>;
}

/// Access to descriptive REIT profiles.
pub trait ProfileSource {
    /// Fetch all profiles, ordered by ticker.
    fn fetch_profiles(&self) -> Result<Vec<ReitProfile>>;
}

impl<T: FundamentalsSource + ?Sized> FundamentalsSource for &T {
    fn fetch_line_items(
        &self,
        tickers: &[String],
        line_items: &[String],
    ) -> Result<Vec<LineItemObservation>> {
        (**self).fetch_line_items(tickers, line_items)
    }

    fn fetch_latest_prices(&self, tickers: &[String]) -> Result<HashMap<String, f64>> {
        (**self).fetch_latest_prices(tickers)
    }
}

impl<T: ProfileSource + ?Sized> ProfileSource for &T {
    fn fetch_profiles(&self) -> Result<Vec<ReitProfile>> {
        (**self).fetch_profiles()
    }
}
