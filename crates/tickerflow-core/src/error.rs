//! Error types for the pipeline.
//!
//! Four failure kinds are distinguished so callers can decide retry vs.
//! abort: connectivity (store/provider/broker transport), data shape
//! (decode/parse), invalid parameters, and brokerage rejection. Numeric
//! edge cases are not errors at all; they propagate as NaN through the
//! indicator engine.

use std::time::Duration;
use thiserror::Error;

/// Top-level pipeline error.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Retry classification for fallible remote calls.
pub trait Transient {
    /// Whether a retry could plausibly succeed.
    fn is_transient(&self) -> bool;

    /// Delay requested by the failing service, when the error carries one.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Relational store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Row decode failed: {0}")]
    Decode(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),
}

impl Transient for StoreError {
    fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Connection(_) | StoreError::Transaction(_)
        )
    }
}

/// Market-data provider errors.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Rate limited: retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No data available for {0}")]
    NoData(String),

    #[error("Ticker universe error: {0}")]
    Universe(String),
}

impl Transient for ProviderError {
    fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::Connection(_) | ProviderError::RateLimited { .. }
        )
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            ProviderError::RateLimited { retry_after_secs } => {
                Some(Duration::from_secs(*retry_after_secs))
            }
            _ => None,
        }
    }
}

/// Brokerage gateway errors.
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Order rejected: {0}")]
    OrderRejected(String),

    #[error("API error: {0}")]
    Api(String),
}

impl Transient for BrokerError {
    /// Rejections are final: resubmitting a rejected order is never
    /// correct.
    fn is_transient(&self) -> bool {
        matches!(self, BrokerError::Connection(_))
    }
}

/// Indicator parameter errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(StoreError::Connection("refused".into()).is_transient());
        assert!(!StoreError::Decode("bad row".into()).is_transient());

        assert!(ProviderError::RateLimited { retry_after_secs: 30 }.is_transient());
        assert!(!ProviderError::Parse("bad json".into()).is_transient());
        assert!(!ProviderError::Configuration("key not set".into()).is_transient());

        assert!(BrokerError::Connection("timeout".into()).is_transient());
        assert!(!BrokerError::OrderRejected("insufficient buying power".into()).is_transient());
    }

    #[test]
    fn test_rate_limit_carries_server_delay() {
        assert_eq!(
            ProviderError::RateLimited { retry_after_secs: 30 }.retry_after(),
            Some(Duration::from_secs(30))
        );
        assert_eq!(ProviderError::Connection("refused".into()).retry_after(), None);
        assert_eq!(StoreError::Connection("refused".into()).retry_after(), None);
    }

    #[test]
    fn test_umbrella_conversions() {
        let err: PipelineError = StoreError::Query("syntax".into()).into();
        assert!(matches!(err, PipelineError::Store(_)));

        let err: PipelineError = BrokerError::OrderRejected("halted".into()).into();
        assert!(matches!(err, PipelineError::Broker(_)));
    }
}
