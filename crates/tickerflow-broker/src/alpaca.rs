//! Alpaca brokerage gateway for paper and live order submission.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tickerflow_core::error::BrokerError;
use tickerflow_core::traits::Broker;
use tickerflow_core::types::{OrderAck, OrderRequest, Side};
use tracing::{debug, info};

/// Alpaca API configuration.
#[derive(Debug, Clone)]
pub struct AlpacaConfig {
    pub api_key: String,
    pub api_secret: String,
    pub paper: bool,
}

impl AlpacaConfig {
    /// Create config directly with key and secret.
    pub fn new(api_key: String, api_secret: String, paper: bool) -> Self {
        Self {
            api_key,
            api_secret,
            paper,
        }
    }

    /// Load from environment variables. `ALPACA_PAPER` defaults to true;
    /// only the literal "false" selects the live endpoint.
    pub fn from_env() -> Result<Self, BrokerError> {
        let api_key = std::env::var("ALPACA_API_KEY")
            .map_err(|_| BrokerError::Configuration("ALPACA_API_KEY not set".into()))?;
        let api_secret = std::env::var("ALPACA_API_SECRET")
            .map_err(|_| BrokerError::Configuration("ALPACA_API_SECRET not set".into()))?;
        let paper = std::env::var("ALPACA_PAPER")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);

        Ok(Self {
            api_key,
            api_secret,
            paper,
        })
    }

    pub fn base_url(&self) -> &str {
        if self.paper {
            "https://paper-api.alpaca.markets"
        } else {
            "https://api.alpaca.markets"
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest {
    symbol: String,
    qty: String,
    side: String,
    #[serde(rename = "type")]
    order_type: String,
    time_in_force: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_order_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlpacaOrder {
    id: String,
    symbol: String,
    side: String,
    status: String,
    submitted_at: Option<String>,
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlpacaClock {
    is_open: bool,
}

/// Alpaca order gateway.
pub struct AlpacaBroker {
    config: AlpacaConfig,
    client: Client,
}

impl AlpacaBroker {
    /// Create a new Alpaca gateway.
    pub fn new(config: AlpacaConfig) -> Result<Self, BrokerError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(&config.api_key)
                .map_err(|e| BrokerError::Configuration(e.to_string()))?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(&config.api_secret)
                .map_err(|e| BrokerError::Configuration(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self, BrokerError> {
        let config = AlpacaConfig::from_env()?;
        Self::new(config)
    }

    fn parse_ack(order: AlpacaOrder) -> Result<OrderAck, BrokerError> {
        let side = order
            .side
            .parse::<Side>()
            .map_err(BrokerError::Api)?;

        let submitted_at = order
            .submitted_at
            .as_deref()
            .or(order.created_at.as_deref())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        Ok(OrderAck {
            id: order.id,
            symbol: order.symbol,
            side,
            status: order.status,
            submitted_at,
        })
    }
}

#[async_trait]
impl Broker for AlpacaBroker {
    async fn submit_order(&self, request: OrderRequest) -> Result<OrderAck, BrokerError> {
        let url = format!("{}/v2/orders", self.config.base_url());

        let create_req = CreateOrderRequest {
            symbol: request.symbol.clone(),
            qty: request.quantity.to_string(),
            side: request.side.as_str().to_string(),
            order_type: "market".to_string(),
            time_in_force: request.time_in_force.as_str().to_string(),
            client_order_id: request.client_order_id.clone(),
        };

        debug!("Submitting order: {:?}", create_req);

        let resp = self
            .client
            .post(&url)
            .json(&create_req)
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(BrokerError::OrderRejected(format!("{}: {}", status, text)));
        }

        let order: AlpacaOrder = resp
            .json()
            .await
            .map_err(|e| BrokerError::Api(e.to_string()))?;

        let ack = Self::parse_ack(order)?;
        info!(
            "Order submitted: {} {} x{} ({})",
            ack.side, ack.symbol, request.quantity, ack.status
        );
        Ok(ack)
    }

    async fn is_market_open(&self) -> Result<bool, BrokerError> {
        let url = format!("{}/v2/clock", self.config.base_url());
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BrokerError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(BrokerError::Api(format!("{}: {}", status, text)));
        }

        let clock: AlpacaClock = resp
            .json()
            .await
            .map_err(|e| BrokerError::Api(e.to_string()))?;
        Ok(clock.is_open)
    }

    fn name(&self) -> &str {
        if self.config.paper {
            "Alpaca Paper"
        } else {
            "Alpaca Live"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(side: &str, submitted_at: Option<&str>) -> AlpacaOrder {
        AlpacaOrder {
            id: "904837e3-3b76-47ec-b432-046db621571b".to_string(),
            symbol: "AAPL".to_string(),
            side: side.to_string(),
            status: "accepted".to_string(),
            submitted_at: submitted_at.map(String::from),
            created_at: None,
        }
    }

    #[test]
    fn test_parse_ack() {
        let ack = AlpacaBroker::parse_ack(order("buy", Some("2024-01-02T14:30:00Z"))).unwrap();
        assert_eq!(ack.symbol, "AAPL");
        assert_eq!(ack.side, Side::Buy);
        assert_eq!(ack.status, "accepted");
        assert_eq!(ack.submitted_at.to_rfc3339(), "2024-01-02T14:30:00+00:00");
    }

    #[test]
    fn test_parse_ack_unknown_side() {
        assert!(matches!(
            AlpacaBroker::parse_ack(order("short", None)),
            Err(BrokerError::Api(_))
        ));
    }

    #[test]
    fn test_base_url_selection() {
        let paper = AlpacaConfig::new("k".into(), "s".into(), true);
        assert_eq!(paper.base_url(), "https://paper-api.alpaca.markets");

        let live = AlpacaConfig::new("k".into(), "s".into(), false);
        assert_eq!(live.base_url(), "https://api.alpaca.markets");
    }

    #[test]
    fn test_order_request_wire_shape() {
        let create_req = CreateOrderRequest {
            symbol: "MSFT".to_string(),
            qty: "1".to_string(),
            side: "sell".to_string(),
            order_type: "market".to_string(),
            time_in_force: "gtc".to_string(),
            client_order_id: None,
        };
        let json = serde_json::to_value(&create_req).unwrap();
        assert_eq!(json["type"], "market");
        assert_eq!(json["qty"], "1");
        assert_eq!(json["time_in_force"], "gtc");
        assert!(json.get("client_order_id").is_none());

        let with_id = CreateOrderRequest {
            client_order_id: Some("run-1-MSFT".to_string()),
            ..create_req
        };
        let json = serde_json::to_value(&with_id).unwrap();
        assert_eq!(json["client_order_id"], "run-1-MSFT");
    }
}
