//! Raw bar ingestion.

use chrono::{DateTime, Duration, Utc};
use tickerflow_core::error::PipelineError;
use tickerflow_core::traits::BarProvider;
use tickerflow_core::types::Timeframe;
use tickerflow_store::Store;
use tracing::{debug, info, warn};

use crate::report::RunReport;
use crate::retry::{with_retry, RetryPolicy};

/// Minutes the fetch window ends before now. The free IEX feed trails
/// real time by 15 minutes.
const FEED_DELAY_MIN: i64 = 16;

/// Fetch window for an ingest run: `lookback_days` back from `now`,
/// ending just before the feed delay cutoff.
pub fn ingest_window(lookback_days: u32, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = now - Duration::minutes(FEED_DELAY_MIN);
    let start = end - Duration::days(i64::from(lookback_days));
    (start, end)
}

/// Fetches bars per ticker and appends them to the raw bar table.
///
/// Tickers fail independently: a fetch or write error is recorded in the
/// report and the run moves on.
pub struct IngestJob<'a> {
    store: &'a Store,
    provider: &'a dyn BarProvider,
    retry: RetryPolicy,
}

impl<'a> IngestJob<'a> {
    pub fn new(store: &'a Store, provider: &'a dyn BarProvider) -> Self {
        Self {
            store,
            provider,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the backoff schedule.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn run(
        &self,
        tickers: &[String],
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<RunReport, PipelineError> {
        info!(
            provider = self.provider.name(),
            tickers = tickers.len(),
            %timeframe,
            %start,
            %end,
            "Starting ingest run"
        );
        let mut report = RunReport::new("ingest");

        for ticker in tickers {
            let fetched = with_retry(&self.retry, || {
                self.provider.fetch_bars(ticker, timeframe, start, end)
            })
            .await;

            let bars = match fetched {
                Ok(bars) => bars,
                Err(e) => {
                    warn!(ticker, error = %e, "Fetch failed");
                    report.fail(ticker, e.to_string());
                    continue;
                }
            };

            if bars.is_empty() {
                debug!(ticker, "No bars in window");
                report.skipped += 1;
                continue;
            }

            // Re-insert is idempotent, so a retried write cannot duplicate.
            let written = with_retry(&self.retry, || self.store.insert_bars(ticker, &bars)).await;

            match written {
                Ok(inserted) => {
                    debug!(ticker, fetched = bars.len(), inserted, "Stored bars");
                    report.succeeded += 1;
                    report.rows_written += inserted;
                }
                Err(e) => {
                    warn!(ticker, error = %e, "Store write failed");
                    report.fail(ticker, e.to_string());
                }
            }
        }

        report.complete();
        info!(
            succeeded = report.succeeded,
            failed = report.failures.len(),
            rows = report.rows_written,
            "Ingest run finished"
        );
        Ok(report)
    }
}
