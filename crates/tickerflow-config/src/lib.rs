//! Configuration management.
//!
//! Settings load from an optional TOML file layered under
//! `TICKERFLOW__*` environment overrides, then validate before any
//! command runs. A missing file is not an error; every section carries
//! working defaults.

mod settings;

pub use settings::{
    AlpacaSettings, AppConfig, AppSettings, IngestSettings, LoggingSettings, TradingSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load and validate configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("TICKERFLOW")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;
    Ok(app_config)
}
