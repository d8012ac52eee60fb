//! Order types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Wire and store label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(format!("unknown side: {other}")),
        }
    }
}

/// Time in force for orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Valid for the trading day only
    Day,
    /// Good til canceled
    #[default]
    Gtc,
}

impl TimeInForce {
    /// Wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Day => "day",
            TimeInForce::Gtc => "gtc",
        }
    }
}

/// Market order request submitted to the brokerage.
///
/// The dispatcher only ever places market orders; limit/stop types are
/// deliberately not modeled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    pub quantity: Decimal,
    pub time_in_force: TimeInForce,
    /// Caller-chosen idempotency key. The brokerage deduplicates on it,
    /// so resubmitting after an ambiguous transport failure is safe.
    pub client_order_id: Option<String>,
}

impl OrderRequest {
    /// Create a market order request, good-till-canceled.
    pub fn market(symbol: impl Into<String>, side: Side, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            time_in_force: TimeInForce::Gtc,
            client_order_id: None,
        }
    }

    /// Set the time in force.
    pub fn with_time_in_force(mut self, tif: TimeInForce) -> Self {
        self.time_in_force = tif;
        self
    }

    /// Set the idempotency key.
    pub fn with_client_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }
}

/// Brokerage acknowledgement of an accepted order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAck {
    /// Broker-assigned order id.
    pub id: String,
    pub symbol: String,
    pub side: Side,
    /// Raw status string reported by the brokerage.
    pub status: String,
    pub submitted_at: DateTime<Utc>,
}

/// Append-only record of a successfully submitted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub symbol: String,
    pub side: Side,
    /// Close price of the signal row that triggered the order.
    pub price: f64,
    pub placed_at: DateTime<Utc>,
}
