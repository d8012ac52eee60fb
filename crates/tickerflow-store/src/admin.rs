//! Destructive maintenance.

use tickerflow_core::error::StoreError;
use tracing::warn;

use crate::store::{
    classify, tx_err, Store, BARS_TABLE, ORDERS_TABLE, REVERSION_INDICATORS_TABLE, SIGNALS_TABLE,
    TREND_INDICATORS_TABLE,
};

impl Store {
    /// Drop the derived tables (indicators, signals, orders); with
    /// `include_bars`, drop the raw bar table too. All drops happen in
    /// one transaction.
    pub async fn reset(&self, include_bars: bool) -> Result<(), StoreError> {
        let mut tables = vec![
            TREND_INDICATORS_TABLE,
            REVERSION_INDICATORS_TABLE,
            SIGNALS_TABLE,
            ORDERS_TABLE,
        ];
        if include_bars {
            tables.push(BARS_TABLE);
        }

        let mut tx = self.pool.begin().await.map_err(tx_err)?;
        for table in &tables {
            sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
                .execute(&mut *tx)
                .await
                .map_err(classify)?;
        }
        tx.commit().await.map_err(tx_err)?;

        warn!(tables = ?tables, "Dropped pipeline tables");
        Ok(())
    }
}
