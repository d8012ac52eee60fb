//! Per-family indicator table writes.
//!
//! Both tables are replaced wholesale on every enrichment run: drop,
//! create, batch insert, all inside one transaction. A failed run rolls
//! back to the previous table contents; a span reconfiguration simply
//! produces a table with the new column names.

use tickerflow_core::{
    error::StoreError,
    types::{ReversionIndicatorRow, TrendIndicatorRow},
};

use crate::store::{
    classify, create_trend_indicators_sql, nan_to_null, tx_err, Store,
    CREATE_REVERSION_INDICATORS_SQL,
};

pub(crate) fn trend_insert_sql(ema_spans: [u32; 3]) -> String {
    let [fast, mid, slow] = ema_spans;
    format!(
        "INSERT INTO trend_indicators \
         (datetime, ticker, open, high, low, close, volume, \
          ema_{fast}, ema_{mid}, ema_{slow}, adx, plus_di, minus_di, trend) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         ON CONFLICT (datetime, ticker) DO UPDATE SET \
          open = EXCLUDED.open, \
          high = EXCLUDED.high, \
          low = EXCLUDED.low, \
          close = EXCLUDED.close, \
          volume = EXCLUDED.volume, \
          ema_{fast} = EXCLUDED.ema_{fast}, \
          ema_{mid} = EXCLUDED.ema_{mid}, \
          ema_{slow} = EXCLUDED.ema_{slow}, \
          adx = EXCLUDED.adx, \
          plus_di = EXCLUDED.plus_di, \
          minus_di = EXCLUDED.minus_di, \
          trend = EXCLUDED.trend"
    )
}

pub(crate) const REVERSION_INSERT_SQL: &str = "\
    INSERT INTO reversion_indicators (datetime, ticker, close, z_score, signal)
    VALUES ($1, $2, $3, $4, $5)
    ON CONFLICT (datetime, ticker) DO UPDATE SET
     close = EXCLUDED.close,
     z_score = EXCLUDED.z_score,
     signal = EXCLUDED.signal";

impl Store {
    /// Replace the trend indicator table with this run's rows. Returns
    /// the number of rows written.
    pub async fn replace_trend_indicators(
        &self,
        rows: &[TrendIndicatorRow],
        ema_spans: [u32; 3],
    ) -> Result<u64, StoreError> {
        let insert_sql = trend_insert_sql(ema_spans);

        let mut tx = self.pool.begin().await.map_err(tx_err)?;
        sqlx::query("DROP TABLE IF EXISTS trend_indicators")
            .execute(&mut *tx)
            .await
            .map_err(classify)?;
        sqlx::query(&create_trend_indicators_sql(ema_spans))
            .execute(&mut *tx)
            .await
            .map_err(classify)?;

        let mut written = 0u64;
        for row in rows {
            let result = sqlx::query(&insert_sql)
                .bind(row.timestamp)
                .bind(&row.ticker)
                .bind(nan_to_null(row.open))
                .bind(nan_to_null(row.high))
                .bind(nan_to_null(row.low))
                .bind(nan_to_null(row.close))
                .bind(row.volume)
                .bind(nan_to_null(row.ema_fast))
                .bind(nan_to_null(row.ema_mid))
                .bind(nan_to_null(row.ema_slow))
                .bind(nan_to_null(row.adx))
                .bind(nan_to_null(row.plus_di))
                .bind(nan_to_null(row.minus_di))
                .bind(row.trend.as_str())
                .execute(&mut *tx)
                .await
                .map_err(classify)?;
            written += result.rows_affected();
        }

        tx.commit().await.map_err(tx_err)?;
        Ok(written)
    }

    /// Replace the mean-reversion indicator table with this run's rows.
    pub async fn replace_reversion_indicators(
        &self,
        rows: &[ReversionIndicatorRow],
    ) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await.map_err(tx_err)?;
        sqlx::query("DROP TABLE IF EXISTS reversion_indicators")
            .execute(&mut *tx)
            .await
            .map_err(classify)?;
        sqlx::query(CREATE_REVERSION_INDICATORS_SQL)
            .execute(&mut *tx)
            .await
            .map_err(classify)?;

        let mut written = 0u64;
        for row in rows {
            let result = sqlx::query(REVERSION_INSERT_SQL)
                .bind(row.timestamp)
                .bind(&row.ticker)
                .bind(nan_to_null(row.close))
                .bind(nan_to_null(row.z_score))
                .bind(row.signal.as_str())
                .execute(&mut *tx)
                .await
                .map_err(classify)?;
            written += result.rows_affected();
        }

        tx.commit().await.map_err(tx_err)?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_insert_columns_follow_spans() {
        let sql = trend_insert_sql([5, 15, 30]);
        assert!(sql.contains("ema_5, ema_15, ema_30"));
        assert!(sql.contains("ema_5 = EXCLUDED.ema_5"));
        assert!(sql.contains("$14"));
        assert!(!sql.contains("$15"));
    }

    #[test]
    fn test_indicator_writes_overwrite_on_key() {
        assert!(trend_insert_sql([10, 20, 50])
            .contains("ON CONFLICT (datetime, ticker) DO UPDATE SET"));
        assert!(REVERSION_INSERT_SQL.contains("ON CONFLICT (datetime, ticker) DO UPDATE SET"));
    }
}
