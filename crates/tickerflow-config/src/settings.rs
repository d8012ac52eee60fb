//! Configuration structures.

use config::ConfigError;
use serde::{Deserialize, Serialize};
use tickerflow_core::types::Timeframe;
use tickerflow_signals::{ReversionParams, TrendParams};
use tickerflow_store::StoreConfig;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub database: StoreConfig,
    #[serde(default)]
    pub alpaca: AlpacaSettings,
    #[serde(default)]
    pub ingest: IngestSettings,
    #[serde(default)]
    pub trend: TrendParams,
    #[serde(default)]
    pub reversion: ReversionParams,
    #[serde(default)]
    pub trading: TradingSettings,
}

impl AppConfig {
    /// Check every section for values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.trend
            .validate()
            .map_err(|e| ConfigError::Message(format!("trend: {}", e)))?;
        self.reversion
            .validate()
            .map_err(|e| ConfigError::Message(format!("reversion: {}", e)))?;
        self.ingest.validate()?;
        self.trading.validate()?;
        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database: max_connections must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "tickerflow".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
    /// Directory for daily-rolling log files; stderr only when unset.
    pub file_dir: Option<String>,
    pub file_prefix: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file_dir: None,
            file_prefix: "tickerflow".to_string(),
        }
    }
}

/// Alpaca endpoint selection. Credentials come from `ALPACA_API_KEY` /
/// `ALPACA_API_SECRET`, never from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlpacaSettings {
    pub paper: bool,
}

impl Default for AlpacaSettings {
    fn default() -> Self {
        Self { paper: true }
    }
}

/// Bar ingestion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    pub tickers_file: String,
    pub lookback_days: u32,
    pub timeframe: String,
    pub provider: String,
    /// Directory of per-ticker CSV files for the csv provider.
    pub csv_dir: String,
}

impl IngestSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.lookback_days == 0 {
            return Err(ConfigError::Message(
                "ingest: lookback_days must be greater than 0".into(),
            ));
        }
        self.timeframe
            .parse::<Timeframe>()
            .map_err(|e| ConfigError::Message(format!("ingest: {}", e)))?;
        match self.provider.as_str() {
            "alpaca" | "csv" => Ok(()),
            other => Err(ConfigError::Message(format!(
                "ingest: unknown provider: {}",
                other
            ))),
        }
    }
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            tickers_file: "config/tickers.csv".to_string(),
            lookback_days: 7,
            timeframe: "1m".to_string(),
            provider: "alpaca".to_string(),
            csv_dir: "data/csv".to_string(),
        }
    }
}

/// Order dispatch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingSettings {
    /// Shares per order.
    pub quantity: u32,
    /// Route orders to the simulated broker.
    pub dry_run: bool,
}

impl TradingSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.quantity == 0 {
            return Err(ConfigError::Message(
                "trading: quantity must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

impl Default for TradingSettings {
    fn default() -> Self {
        Self {
            quantity: 1,
            dry_run: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.app.name, "tickerflow");
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.alpaca.paper);
        assert_eq!(cfg.ingest.provider, "alpaca");
        assert_eq!(cfg.ingest.lookback_days, 7);
        assert_eq!(cfg.trend.ema_fast, 10);
        assert_eq!(cfg.trend.ema_slow, 50);
        assert_eq!(cfg.reversion.window, 20);
        assert_eq!(cfg.trading.quantity, 1);
        assert!(!cfg.trading.dry_run);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [database]
            host = "db.internal"
            port = 5433
            user = "pipeline"
            password = "secret"
            dbname = "bars"
            max_connections = 10

            [alpaca]
            paper = false
            "#,
        )
        .unwrap();

        assert_eq!(cfg.database.host, "db.internal");
        assert_eq!(cfg.database.port, 5433);
        assert!(!cfg.alpaca.paper);
        // Unlisted sections fall back to defaults
        assert_eq!(cfg.ingest.timeframe, "1m");
        assert_eq!(cfg.trend.adx_threshold, 25.0);
    }

    #[test]
    fn test_single_key_section_fills_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [ingest]
            lookback_days = 3
            "#,
        )
        .unwrap();

        assert_eq!(cfg.ingest.lookback_days, 3);
        assert_eq!(cfg.ingest.provider, "alpaca");
        assert_eq!(cfg.ingest.tickers_file, "config/tickers.csv");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let mut cfg = AppConfig::default();
        cfg.trading.quantity = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_lookback() {
        let mut cfg = AppConfig::default();
        cfg.ingest.lookback_days = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_provider() {
        let mut cfg = AppConfig::default();
        cfg.ingest.provider = "yahoo".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_timeframe() {
        let mut cfg = AppConfig::default();
        cfg.ingest.timeframe = "4h".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unordered_spans() {
        let mut cfg = AppConfig::default();
        cfg.trend.ema_mid = 60; // fast < mid < slow violated
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_timeframe_accepts_alpaca_spelling() {
        let mut cfg = AppConfig::default();
        cfg.ingest.timeframe = "1Min".to_string();
        assert!(cfg.validate().is_ok());
        cfg.ingest.timeframe = "1Day".to_string();
        assert!(cfg.validate().is_ok());
    }
}
