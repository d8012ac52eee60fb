//! Enrich signals command.

use anyhow::Result;
use tickerflow_config::AppConfig;
use tickerflow_pipeline::{EnrichJob, Family};
use tickerflow_store::Store;

use crate::cli::EnrichArgs;

pub async fn run(args: EnrichArgs, config: &AppConfig) -> Result<()> {
    let family = args.family.parse::<Family>().map_err(anyhow::Error::msg)?;

    let store = Store::connect(&config.database).await?;
    store
        .ensure_schema([
            config.trend.ema_fast,
            config.trend.ema_mid,
            config.trend.ema_slow,
        ])
        .await?;

    let reports = EnrichJob::new(&store, config.trend.clone(), config.reversion.clone())
        .run(family)
        .await?;
    for report in &reports {
        println!("{}", report.summary());
    }

    Ok(())
}
