//! Concurrent latest-price refresh.

use fremantle_data::{DataError, PriceObservation};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use tracing::warn;

/// Prices fetched in one refresh, plus the tickers that failed.
#[derive(Debug, Default)]
pub(crate) struct RefreshOutcome {
    pub(crate) prices: Vec<PriceObservation>,
    pub(crate) failed: Vec<(String, DataError)>,
}

pub(crate) fn progress_bar(len: usize) -> Result<ProgressBar, indicatif::style::TemplateError> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    Ok(pb)
}

/// Fetch a price for every ticker with at most `concurrency` requests in
/// flight. Failures are logged and collected; they never stop the refresh.
pub(crate) async fn fetch_all<F, Fut>(
    tickers: Vec<String>,
    concurrency: usize,
    progress: &ProgressBar,
    fetch: F,
) -> RefreshOutcome
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = fremantle_data::Result<PriceObservation>>,
{
    progress.set_message(format!(
        "Fetching {} prices ({} concurrent)...",
        tickers.len(),
        concurrency
    ));

    let results: Vec<(String, fremantle_data::Result<PriceObservation>)> = stream::iter(tickers)
        .map(|ticker| {
            let request = fetch(ticker.clone());
            async move { (ticker, request.await) }
        })
        .buffer_unordered(concurrency.max(1))
        .inspect(|(ticker, result)| {
            if let Err(e) = result {
                progress.suspend(|| warn!(%ticker, error = %e, "price fetch failed"));
            }
            progress.inc(1);
        })
        .collect()
        .await;

    let mut outcome = RefreshOutcome::default();
    for (ticker, result) in results {
        match result {
            Ok(price) => outcome.prices.push(price),
            Err(e) => outcome.failed.push((ticker, e)),
        }
    }
    outcome.prices.sort_by(|a, b| a.ticker.cmp(&b.ticker));
    outcome.failed.sort_by(|a, b| a.0.cmp(&b.0));
    outcome
}
