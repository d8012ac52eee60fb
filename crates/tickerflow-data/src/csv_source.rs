//! CSV bar files, one file per ticker.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use tickerflow_core::error::ProviderError;
use tickerflow_core::traits::BarProvider;
use tickerflow_core::types::{Bar, Timeframe};
use tracing::debug;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(
        alias = "Timestamp",
        alias = "timestamp",
        alias = "Datetime",
        alias = "datetime",
        alias = "Date",
        alias = "date"
    )]
    timestamp: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: i64,
}

/// Historical bars from `{dir}/{TICKER}.csv` files.
pub struct CsvBars {
    dir: PathBuf,
}

impl CsvBars {
    /// Serve bars from CSV files under `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, ProviderError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut bars = Vec::new();
        for result in csv_reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| ProviderError::Parse(e.to_string()))?;
            let timestamp = parse_timestamp(&record.timestamp)?;
            bars.push(Bar::new(
                timestamp,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        bars.sort_by_key(|b| b.timestamp);
        Ok(bars)
    }
}

/// Parse various timestamp formats.
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ProviderError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let formats = ["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];
    for format in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt.and_utc());
        }
    }
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(value, format) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc());
            }
        }
    }

    // Unix timestamp fallback, millis if > 10 digits
    if let Ok(ts) = value.parse::<i64>() {
        let parsed = if ts > 10_000_000_000 {
            DateTime::from_timestamp_millis(ts)
        } else {
            DateTime::from_timestamp(ts, 0)
        };
        if let Some(dt) = parsed {
            return Ok(dt);
        }
    }

    Err(ProviderError::Parse(format!(
        "could not parse timestamp: {}",
        value
    )))
}

#[async_trait]
impl BarProvider for CsvBars {
    async fn fetch_bars(
        &self,
        ticker: &str,
        _timeframe: Timeframe,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Bar>, ProviderError> {
        let path = self.dir.join(format!("{}.csv", ticker));
        if !path.exists() {
            return Err(ProviderError::NoData(ticker.to_string()));
        }

        let file = std::fs::File::open(&path)
            .map_err(|e| ProviderError::Parse(format!("{}: {}", path.display(), e)))?;
        let mut bars = Self::read_bars(file)?;
        bars.retain(|b| b.timestamp >= start && b.timestamp <= end);

        debug!(ticker, bars = bars.len(), path = %path.display(), "Loaded bars from CSV");
        Ok(bars)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2024-01-15T10:30:00Z").is_ok());
        assert!(parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert!(parse_timestamp("2024-01-15").is_ok());
        assert!(parse_timestamp("1705312800000").is_ok()); // Unix ms
        assert!(parse_timestamp("1705312800").is_ok()); // Unix sec
        assert!(parse_timestamp("not a date").is_err());
    }

    #[test]
    fn test_parse_timestamp_midnight_for_dates() {
        let dt = parse_timestamp("2024-01-15").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T00:00:00+00:00");
    }

    #[test]
    fn test_read_bars_sorts_and_maps_headers() {
        let csv = "\
Datetime,Open,High,Low,Close,Volume
2024-01-02 09:31:00,101.0,102.0,100.5,101.5,2000
2024-01-02 09:30:00,100.0,101.0,99.5,100.5,1000
";
        let bars = CsvBars::read_bars(csv.as_bytes()).unwrap();
        assert_eq!(bars.len(), 2);
        assert!(bars[0].timestamp < bars[1].timestamp);
        assert!((bars[0].close - 100.5).abs() < 1e-12);
        assert_eq!(bars[1].volume, 2000);
    }

    #[test]
    fn test_read_bars_defaults_missing_volume() {
        let csv = "\
timestamp,open,high,low,close
2024-01-02T09:30:00Z,100.0,101.0,99.5,100.5
";
        let bars = CsvBars::read_bars(csv.as_bytes()).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].volume, 0);
    }

    #[test]
    fn test_read_bars_rejects_garbage() {
        let csv = "\
timestamp,open,high,low,close,volume
yesterday,100.0,101.0,99.5,100.5,1000
";
        assert!(matches!(
            CsvBars::read_bars(csv.as_bytes()),
            Err(ProviderError::Parse(_))
        ));
    }
}
