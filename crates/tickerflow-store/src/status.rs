//! Data-quality summaries over the pipeline tables.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tickerflow_core::error::StoreError;

use crate::store::{
    classify, Store, BARS_TABLE, ORDERS_TABLE, REVERSION_INDICATORS_TABLE, SIGNALS_TABLE,
    TREND_INDICATORS_TABLE,
};

/// Row-count and time-range summary for one table.
#[derive(Debug, Clone, Serialize)]
pub struct TableStatus {
    pub table: String,
    pub rows: i64,
    pub tickers: i64,
    pub earliest: Option<DateTime<Utc>>,
    pub latest: Option<DateTime<Utc>>,
}

/// Bar-count and freshness for one ticker.
#[derive(Debug, Clone, Serialize)]
pub struct TickerStatus {
    pub ticker: String,
    pub bars: i64,
    pub latest: DateTime<Utc>,
}

impl Store {
    async fn table_exists(&self, table: &str) -> Result<bool, StoreError> {
        let (exists,) = sqlx::query_as::<_, (bool,)>(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )",
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;
        Ok(exists)
    }

    /// Summary of every pipeline table that exists, in pipeline order.
    pub async fn table_status(&self) -> Result<Vec<TableStatus>, StoreError> {
        let tables = [
            (BARS_TABLE, "ticker", "datetime"),
            (TREND_INDICATORS_TABLE, "ticker", "datetime"),
            (REVERSION_INDICATORS_TABLE, "ticker", "datetime"),
            (SIGNALS_TABLE, "ticker", "datetime"),
            (ORDERS_TABLE, "symbol", "placed_at"),
        ];

        let mut statuses = Vec::new();
        for (table, ticker_column, time_column) in tables {
            if !self.table_exists(table).await? {
                continue;
            }
            let sql = format!(
                "SELECT COUNT(*), COUNT(DISTINCT {ticker_column}), \
                 MIN({time_column}), MAX({time_column}) FROM {table}"
            );
            let (rows, tickers, earliest, latest) = sqlx::query_as::<
                _,
                (i64, i64, Option<DateTime<Utc>>, Option<DateTime<Utc>>),
            >(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;

            statuses.push(TableStatus {
                table: table.to_string(),
                rows,
                tickers,
                earliest,
                latest,
            });
        }
        Ok(statuses)
    }

    /// Per-ticker bar freshness, stalest ticker first.
    pub async fn ticker_staleness(&self) -> Result<Vec<TickerStatus>, StoreError> {
        let rows = sqlx::query_as::<_, (String, i64, DateTime<Utc>)>(
            "SELECT ticker, COUNT(*), MAX(datetime)
             FROM bars GROUP BY ticker ORDER BY MAX(datetime)",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(rows
            .into_iter()
            .map(|(ticker, bars, latest)| TickerStatus {
                ticker,
                bars,
                latest,
            })
            .collect())
    }
}
