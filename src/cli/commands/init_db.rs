//! Initialize database command.

use anyhow::Result;
use tickerflow_config::AppConfig;
use tickerflow_store::Store;

pub async fn run(config: &AppConfig) -> Result<()> {
    let store = Store::connect(&config.database).await?;
    store
        .ensure_schema([
            config.trend.ema_fast,
            config.trend.ema_mid,
            config.trend.ema_slow,
        ])
        .await?;

    println!(
        "Pipeline tables ready in {}:{}/{}",
        config.database.host, config.database.port, config.database.dbname
    );
    Ok(())
}
