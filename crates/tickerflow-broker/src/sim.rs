//! Simulated broker for dry runs and dispatcher tests.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Mutex;
use tickerflow_core::error::BrokerError;
use tickerflow_core::traits::Broker;
use tickerflow_core::types::{OrderAck, OrderRequest};
use uuid::Uuid;

/// In-memory broker that accepts every order unless told otherwise.
pub struct SimBroker {
    submitted: Mutex<Vec<OrderAck>>,
    reject: HashSet<String>,
    market_open: bool,
}

impl SimBroker {
    /// Create a simulated broker with an open market.
    pub fn new() -> Self {
        Self {
            submitted: Mutex::new(Vec::new()),
            reject: HashSet::new(),
            market_open: true,
        }
    }

    /// Reject every order for `symbol`.
    pub fn with_rejection(mut self, symbol: impl Into<String>) -> Self {
        self.reject.insert(symbol.into());
        self
    }

    /// Report the market as closed.
    pub fn with_market_closed(mut self) -> Self {
        self.market_open = false;
        self
    }

    /// Snapshot of every acknowledged submission, in order.
    pub fn submissions(&self) -> Vec<OrderAck> {
        self.submitted.lock().unwrap().clone()
    }
}

impl Default for SimBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Broker for SimBroker {
    async fn submit_order(&self, request: OrderRequest) -> Result<OrderAck, BrokerError> {
        if self.reject.contains(&request.symbol) {
            return Err(BrokerError::OrderRejected(format!(
                "simulated rejection for {}",
                request.symbol
            )));
        }

        let ack = OrderAck {
            id: Uuid::new_v4().to_string(),
            symbol: request.symbol.clone(),
            side: request.side,
            status: "accepted".to_string(),
            submitted_at: Utc::now(),
        };

        self.submitted.lock().unwrap().push(ack.clone());
        Ok(ack)
    }

    async fn is_market_open(&self) -> Result<bool, BrokerError> {
        Ok(self.market_open)
    }

    fn name(&self) -> &str {
        "Simulated"
    }
}
