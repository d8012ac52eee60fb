//! Indicator and signal enrichment.

use std::str::FromStr;
use tickerflow_core::error::PipelineError;
use tickerflow_core::types::{GroupedBars, TickerSeries};
use tickerflow_signals::{
    enrich_reversion, enrich_trend, reversion_signal_rows, trend_signal_rows, ReversionParams,
    TrendParams,
};
use tickerflow_store::Store;
use tracing::{debug, info};

use crate::report::RunReport;
use crate::retry::{with_retry, RetryPolicy};

/// Which strategy family an enrich run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Family {
    Trend,
    Reversion,
    #[default]
    All,
}

impl Family {
    fn includes_trend(&self) -> bool {
        matches!(self, Family::Trend | Family::All)
    }

    fn includes_reversion(&self) -> bool {
        matches!(self, Family::Reversion | Family::All)
    }
}

impl FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trend" => Ok(Family::Trend),
            "reversion" => Ok(Family::Reversion),
            "all" => Ok(Family::All),
            other => Err(format!("unknown family: {other}")),
        }
    }
}

/// Recomputes indicator tables from raw bars and projects signal rows,
/// one strategy family at a time.
///
/// Each family's run replaces its indicator table and upserts its column
/// of the signal table; tickers are computed independently.
pub struct EnrichJob<'a> {
    store: &'a Store,
    trend: TrendParams,
    reversion: ReversionParams,
    retry: RetryPolicy,
}

impl<'a> EnrichJob<'a> {
    pub fn new(store: &'a Store, trend: TrendParams, reversion: ReversionParams) -> Self {
        Self {
            store,
            trend,
            reversion,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the backoff schedule.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run the selected families against all stored bars.
    pub async fn run(&self, family: Family) -> Result<Vec<RunReport>, PipelineError> {
        let grouped = self.store.fetch_grouped_bars().await?;
        info!(tickers = grouped.len(), ?family, "Starting enrich run");

        let mut reports = Vec::new();
        if family.includes_trend() {
            reports.push(self.run_trend(&grouped).await?);
        }
        if family.includes_reversion() {
            reports.push(self.run_reversion(&grouped).await?);
        }
        Ok(reports)
    }

    async fn run_trend(&self, grouped: &GroupedBars) -> Result<RunReport, PipelineError> {
        let mut report = RunReport::new("enrich-trend");
        let mut indicator_rows = Vec::new();

        for (ticker, bars) in grouped {
            let series = TickerSeries::new(ticker.clone(), bars.clone());
            match enrich_trend(&series, &self.trend) {
                Ok(rows) if rows.is_empty() => report.skipped += 1,
                Ok(rows) => {
                    debug!(%ticker, rows = rows.len(), "Computed trend rows");
                    report.succeeded += 1;
                    indicator_rows.extend(rows);
                }
                Err(e) => report.fail(ticker, e.to_string()),
            }
        }

        // Replace rebuilds the table and the upsert is keyed, so a retried
        // write cannot duplicate rows.
        let spans = [self.trend.ema_fast, self.trend.ema_mid, self.trend.ema_slow];
        report.rows_written += with_retry(&self.retry, || {
            self.store.replace_trend_indicators(&indicator_rows, spans)
        })
        .await?;
        let signal_rows = trend_signal_rows(&indicator_rows);
        report.rows_written +=
            with_retry(&self.retry, || self.store.upsert_trend_signals(&signal_rows)).await?;

        report.complete();
        info!(
            tickers = report.succeeded,
            rows = report.rows_written,
            "Trend enrichment finished"
        );
        Ok(report)
    }

    async fn run_reversion(&self, grouped: &GroupedBars) -> Result<RunReport, PipelineError> {
        let mut report = RunReport::new("enrich-reversion");
        let mut indicator_rows = Vec::new();

        for (ticker, bars) in grouped {
            let series = TickerSeries::new(ticker.clone(), bars.clone());
            match enrich_reversion(&series, &self.reversion) {
                Ok(rows) if rows.is_empty() => report.skipped += 1,
                Ok(rows) => {
                    debug!(%ticker, rows = rows.len(), "Computed reversion rows");
                    report.succeeded += 1;
                    indicator_rows.extend(rows);
                }
                Err(e) => report.fail(ticker, e.to_string()),
            }
        }

        report.rows_written += with_retry(&self.retry, || {
            self.store.replace_reversion_indicators(&indicator_rows)
        })
        .await?;
        let signal_rows = reversion_signal_rows(&indicator_rows);
        report.rows_written += with_retry(&self.retry, || {
            self.store.upsert_reversion_signals(&signal_rows)
        })
        .await?;

        report.complete();
        info!(
            tickers = report.succeeded,
            rows = report.rows_written,
            "Reversion enrichment finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_parsing() {
        assert_eq!("trend".parse::<Family>().unwrap(), Family::Trend);
        assert_eq!("Reversion".parse::<Family>().unwrap(), Family::Reversion);
        assert_eq!("all".parse::<Family>().unwrap(), Family::All);
        assert!("momentum".parse::<Family>().is_err());
    }

    #[test]
    fn test_family_selection() {
        assert!(Family::All.includes_trend());
        assert!(Family::All.includes_reversion());
        assert!(Family::Trend.includes_trend());
        assert!(!Family::Trend.includes_reversion());
        assert!(!Family::Reversion.includes_trend());
    }
}
