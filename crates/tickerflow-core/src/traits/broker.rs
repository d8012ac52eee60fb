//! Brokerage gateway trait.

use crate::error::BrokerError;
use crate::types::{OrderAck, OrderRequest};
use async_trait::async_trait;

/// Order-submission gateway.
///
/// The dispatcher submits fixed-quantity market orders and needs nothing
/// else from the brokerage. Rejections surface as
/// [`BrokerError::OrderRejected`]; transport failures as
/// [`BrokerError::Connection`].
#[async_trait]
pub trait Broker: Send + Sync {
    /// Submit an order, returning the brokerage acknowledgement.
    async fn submit_order(&self, request: OrderRequest) -> Result<OrderAck, BrokerError>;

    /// Whether the market is currently open for trading.
    async fn is_market_open(&self) -> Result<bool, BrokerError>;

    /// Gateway name for logs.
    fn name(&self) -> &str;
}
