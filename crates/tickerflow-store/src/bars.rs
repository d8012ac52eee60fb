//! Raw bar reads and writes.

use chrono::{DateTime, Utc};
use tickerflow_core::{
    error::StoreError,
    types::{Bar, GroupedBars},
};

use crate::store::{classify, tx_err, Store};

pub(crate) const INSERT_BAR_SQL: &str = "\
    INSERT INTO bars (datetime, ticker, open, high, low, close, volume)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    ON CONFLICT (datetime, ticker) DO NOTHING";

impl Store {
    /// Insert raw bars for one ticker inside a single transaction.
    /// Duplicate (datetime, ticker) keys from overlapping fetch windows
    /// are dropped, so re-ingesting a window is idempotent. Returns the
    /// number of rows actually inserted.
    pub async fn insert_bars(&self, ticker: &str, bars: &[Bar]) -> Result<u64, StoreError> {
        if bars.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(tx_err)?;
        let mut inserted = 0u64;
        for bar in bars {
            let result = sqlx::query(INSERT_BAR_SQL)
                .bind(bar.timestamp)
                .bind(ticker)
                .bind(bar.open)
                .bind(bar.high)
                .bind(bar.low)
                .bind(bar.close)
                .bind(bar.volume)
                .execute(&mut *tx)
                .await
                .map_err(classify)?;
            inserted += result.rows_affected();
        }
        tx.commit().await.map_err(tx_err)?;
        Ok(inserted)
    }

    /// The whole bar table grouped by ticker, each group oldest first.
    pub async fn fetch_grouped_bars(&self) -> Result<GroupedBars, StoreError> {
        let rows = sqlx::query_as::<_, (String, DateTime<Utc>, f64, f64, f64, f64, i64)>(
            "SELECT ticker, datetime, open, high, low, close, volume
             FROM bars ORDER BY ticker, datetime",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        let mut grouped = GroupedBars::new();
        for (ticker, timestamp, open, high, low, close, volume) in rows {
            grouped
                .entry(ticker)
                .or_default()
                .push(Bar::new(timestamp, open, high, low, close, volume));
        }
        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Raw bars must never be overwritten by a re-fetch.
    #[test]
    fn test_bar_insert_drops_duplicates() {
        assert!(INSERT_BAR_SQL.contains("ON CONFLICT (datetime, ticker) DO NOTHING"));
        assert!(!INSERT_BAR_SQL.contains("DO UPDATE"));
    }
}
