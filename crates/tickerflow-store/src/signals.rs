//! Unified signal table: per-family column upserts and the dispatcher's
//! latest-per-ticker read.

use chrono::{DateTime, Utc};
use std::str::FromStr;
use tickerflow_core::{
    error::StoreError,
    types::{Reversion, SignalRow, Trend},
};

use crate::store::{classify, nan_to_null, null_to_nan, tx_err, Store};

/// One upsert statement per family: only that family's column (plus
/// close) is overwritten, so a trend run never clobbers a stored
/// reversion label and vice versa.
fn signal_upsert_sql(column: &str) -> String {
    format!(
        "INSERT INTO signals (datetime, ticker, close, {column}) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (datetime, ticker) DO UPDATE SET \
          close = EXCLUDED.close, \
          {column} = EXCLUDED.{column}"
    )
}

fn parse_label<T>(value: Option<String>) -> Result<Option<T>, StoreError>
where
    T: FromStr<Err = String>,
{
    value
        .as_deref()
        .map(T::from_str)
        .transpose()
        .map_err(StoreError::Decode)
}

impl Store {
    async fn upsert_signal_column<F>(
        &self,
        rows: &[SignalRow],
        column: &str,
        label: F,
    ) -> Result<u64, StoreError>
    where
        F: Fn(&SignalRow) -> Option<&'static str>,
    {
        if rows.is_empty() {
            return Ok(0);
        }

        let sql = signal_upsert_sql(column);
        let mut tx = self.pool.begin().await.map_err(tx_err)?;
        let mut written = 0u64;
        for row in rows {
            let result = sqlx::query(&sql)
                .bind(row.timestamp)
                .bind(&row.ticker)
                .bind(nan_to_null(row.close))
                .bind(label(row))
                .execute(&mut *tx)
                .await
                .map_err(classify)?;
            written += result.rows_affected();
        }
        tx.commit().await.map_err(tx_err)?;
        Ok(written)
    }

    /// Upsert the trend family's projection into the signal table.
    pub async fn upsert_trend_signals(&self, rows: &[SignalRow]) -> Result<u64, StoreError> {
        self.upsert_signal_column(rows, "trend", |row| row.trend.map(|t| t.as_str()))
            .await
    }

    /// Upsert the mean-reversion family's projection into the signal table.
    pub async fn upsert_reversion_signals(&self, rows: &[SignalRow]) -> Result<u64, StoreError> {
        self.upsert_signal_column(rows, "signal", |row| row.signal.map(|s| s.as_str()))
            .await
    }

    /// The most recent signal row per ticker. This is the dispatcher's
    /// input: exactly one row per ticker, the one with the greatest
    /// timestamp.
    pub async fn latest_signals(&self) -> Result<Vec<SignalRow>, StoreError> {
        let rows = sqlx::query_as::<
            _,
            (
                DateTime<Utc>,
                String,
                Option<f64>,
                Option<String>,
                Option<String>,
            ),
        >(
            "SELECT DISTINCT ON (ticker) datetime, ticker, close, trend, signal
             FROM signals ORDER BY ticker, datetime DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        rows.into_iter()
            .map(|(timestamp, ticker, close, trend, signal)| {
                Ok(SignalRow {
                    timestamp,
                    ticker,
                    close: null_to_nan(close),
                    trend: parse_label::<Trend>(trend)?,
                    signal: parse_label::<Reversion>(signal)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_touches_only_own_column() {
        let trend = signal_upsert_sql("trend");
        assert!(trend.contains("trend = EXCLUDED.trend"));
        assert!(!trend.contains("signal = EXCLUDED.signal"));

        let reversion = signal_upsert_sql("signal");
        assert!(reversion.contains("signal = EXCLUDED.signal"));
        assert!(!reversion.contains("trend = EXCLUDED.trend"));
    }

    #[test]
    fn test_label_decoding() {
        assert_eq!(
            parse_label::<Trend>(Some("uptrend".to_string())).unwrap(),
            Some(Trend::Uptrend)
        );
        assert_eq!(parse_label::<Trend>(None).unwrap(), None);
        assert_eq!(
            parse_label::<Reversion>(Some("buy".to_string())).unwrap(),
            Some(Reversion::Buy)
        );
        assert!(matches!(
            parse_label::<Trend>(Some("sideways".to_string())),
            Err(StoreError::Decode(_))
        ));
    }
}
