//! Validate configuration command.

use anyhow::Result;
use tickerflow_config::AppConfig;

/// Config load and validation happen before dispatch, so reaching this
/// point means the file passed. Print the effective settings.
pub async fn run(config: &AppConfig) -> Result<()> {
    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!(
        "Database: {}:{}/{}",
        config.database.host, config.database.port, config.database.dbname
    );
    println!("Alpaca paper mode: {}", config.alpaca.paper);
    println!("Ingest provider: {}", config.ingest.provider);
    println!("Ingest timeframe: {}", config.ingest.timeframe);
    println!("Ingest lookback: {} days", config.ingest.lookback_days);
    println!(
        "Trend EMA spans: {}/{}/{}",
        config.trend.ema_fast, config.trend.ema_mid, config.trend.ema_slow
    );
    println!("Trend ADX span: {}", config.trend.adx_span);
    println!("Reversion window: {}", config.reversion.window);
    println!("Reversion threshold: {}", config.reversion.entry_threshold);
    println!("Trade quantity: {}", config.trading.quantity);
    println!("Dry run: {}", config.trading.dry_run);

    Ok(())
}
