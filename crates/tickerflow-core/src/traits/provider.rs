//! Market-data provider trait.

use crate::error::ProviderError;
use crate::types::{Bar, Timeframe};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Historical bar source.
#[async_trait]
pub trait BarProvider: Send + Sync {
    /// Fetch bars for one ticker over a window.
    ///
    /// # Arguments
    /// * `ticker` - The ticker symbol to fetch
    /// * `timeframe` - The bar aggregation interval
    /// * `start` - Start of the window (inclusive)
    /// * `end` - End of the window (inclusive)
    ///
    /// # Returns
    /// Bars ordered oldest to newest. An empty window is not an error.
    async fn fetch_bars(
        &self,
        ticker: &str,
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, ProviderError>;

    /// Provider name for logs.
    fn name(&self) -> &str;
}
