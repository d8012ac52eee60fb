//! Append-only order records.

use chrono::{DateTime, Utc};
use tickerflow_core::{
    error::StoreError,
    types::{OrderRecord, Side},
};

use crate::store::{classify, Store};

impl Store {
    /// Append one order record with a store-assigned timestamp. Called
    /// only after the brokerage accepted the order.
    pub async fn append_order(
        &self,
        symbol: &str,
        side: Side,
        price: f64,
    ) -> Result<OrderRecord, StoreError> {
        let (placed_at,) = sqlx::query_as::<_, (DateTime<Utc>,)>(
            "INSERT INTO orders (symbol, side, price)
             VALUES ($1, $2, $3)
             RETURNING placed_at",
        )
        .bind(symbol)
        .bind(side.as_str())
        .bind(price)
        .fetch_one(&self.pool)
        .await
        .map_err(classify)?;

        Ok(OrderRecord {
            symbol: symbol.to_string(),
            side,
            price,
            placed_at,
        })
    }

    /// Most recent order records, newest first.
    pub async fn recent_orders(&self, limit: i64) -> Result<Vec<OrderRecord>, StoreError> {
        let rows = sqlx::query_as::<_, (String, String, f64, DateTime<Utc>)>(
            "SELECT symbol, side, price, placed_at
             FROM orders ORDER BY placed_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        rows.into_iter()
            .map(|(symbol, side, price, placed_at)| {
                let side = side.parse::<Side>().map_err(StoreError::Decode)?;
                Ok(OrderRecord {
                    symbol,
                    side,
                    price,
                    placed_at,
                })
            })
            .collect()
    }
}
