//! Alpaca market-data client.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use tickerflow_core::error::ProviderError;
use tickerflow_core::traits::BarProvider;
use tickerflow_core::types::{Bar, Timeframe};
use tracing::debug;

const DATA_URL: &str = "https://data.alpaca.markets";

/// Max bars per page on the data API.
const PAGE_LIMIT: u32 = 10_000;

#[derive(Debug, Deserialize)]
struct AlpacaBar {
    t: String,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: i64,
}

/// One page of the bars endpoint. `bars` is null (not `[]`) when the
/// window holds no data.
#[derive(Debug, Deserialize)]
struct BarsPage {
    bars: Option<Vec<AlpacaBar>>,
    next_page_token: Option<String>,
}

/// Historical bars from the Alpaca data API (free IEX feed).
pub struct AlpacaData {
    client: Client,
}

impl AlpacaData {
    /// Create a client with explicit credentials.
    pub fn new(api_key: &str, api_secret: &str) -> Result<Self, ProviderError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            "APCA-API-KEY-ID",
            header::HeaderValue::from_str(api_key)
                .map_err(|e| ProviderError::Configuration(e.to_string()))?,
        );
        headers.insert(
            "APCA-API-SECRET-KEY",
            header::HeaderValue::from_str(api_secret)
                .map_err(|e| ProviderError::Configuration(e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ProviderError::Connection(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create from `ALPACA_API_KEY` / `ALPACA_API_SECRET`.
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var("ALPACA_API_KEY")
            .map_err(|_| ProviderError::Configuration("ALPACA_API_KEY not set".into()))?;
        let api_secret = std::env::var("ALPACA_API_SECRET")
            .map_err(|_| ProviderError::Configuration("ALPACA_API_SECRET not set".into()))?;
        Self::new(&api_key, &api_secret)
    }

    fn convert(raw: AlpacaBar) -> Result<Bar, ProviderError> {
        let timestamp = DateTime::parse_from_rfc3339(&raw.t)
            .map_err(|e| ProviderError::Parse(format!("bar timestamp {:?}: {}", raw.t, e)))?
            .with_timezone(&Utc);
        Ok(Bar::new(timestamp, raw.o, raw.h, raw.l, raw.c, raw.v))
    }
}

#[async_trait]
impl BarProvider for AlpacaData {
    async fn fetch_bars(
        &self,
        ticker: &str,
        timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, ProviderError> {
        let url = format!("{}/v2/stocks/{}/bars", DATA_URL, ticker);
        let start = start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let end = end.to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut bars = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let mut params = vec![
                ("timeframe", timeframe.as_alpaca().to_string()),
                ("start", start.clone()),
                ("end", end.clone()),
                ("limit", PAGE_LIMIT.to_string()),
                ("feed", "iex".to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("page_token", token.clone()));
            }

            let resp = self
                .client
                .get(&url)
                .query(&params)
                .send()
                .await
                .map_err(|e| ProviderError::Connection(e.to_string()))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = resp
                    .headers()
                    .get(header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);
                return Err(ProviderError::RateLimited { retry_after_secs });
            }

            if !resp.status().is_success() {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                return Err(ProviderError::Api(format!("{}: {}", status, text)));
            }

            let page: BarsPage = resp
                .json()
                .await
                .map_err(|e| ProviderError::Parse(e.to_string()))?;

            pages += 1;
            for raw in page.bars.unwrap_or_default() {
                bars.push(Self::convert(raw)?);
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        bars.sort_by_key(|b| b.timestamp);
        debug!(ticker, pages, bars = bars.len(), "Fetched bars from Alpaca");
        Ok(bars)
    }

    fn name(&self) -> &str {
        "alpaca"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_parses_rfc3339() {
        let raw = AlpacaBar {
            t: "2024-01-02T14:30:00Z".to_string(),
            o: 10.0,
            h: 11.0,
            l: 9.5,
            c: 10.5,
            v: 1200,
        };
        let bar = AlpacaData::convert(raw).unwrap();
        assert_eq!(bar.timestamp.to_rfc3339(), "2024-01-02T14:30:00+00:00");
        assert!((bar.close - 10.5).abs() < 1e-12);
        assert_eq!(bar.volume, 1200);
    }

    #[test]
    fn test_convert_rejects_bad_timestamp() {
        let raw = AlpacaBar {
            t: "01/02/2024".to_string(),
            o: 1.0,
            h: 1.0,
            l: 1.0,
            c: 1.0,
            v: 0,
        };
        assert!(matches!(
            AlpacaData::convert(raw),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_page_deserializes_null_bars() {
        let page: BarsPage =
            serde_json::from_str(r#"{"bars": null, "symbol": "AAPL", "next_page_token": null}"#)
                .unwrap();
        assert!(page.bars.is_none());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_page_deserializes_bars() {
        let body = r#"{
            "bars": [
                {"t": "2024-01-02T14:30:00Z", "o": 10.0, "h": 11.0, "l": 9.5, "c": 10.5, "v": 1200}
            ],
            "symbol": "AAPL",
            "next_page_token": "abc123"
        }"#;
        let page: BarsPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.bars.as_ref().map(Vec::len), Some(1));
        assert_eq!(page.next_page_token.as_deref(), Some("abc123"));
    }
}
