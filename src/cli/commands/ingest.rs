//! Ingest bars command.

use anyhow::Result;
use chrono::Utc;
use std::path::Path;
use tickerflow_config::AppConfig;
use tickerflow_core::{traits::BarProvider, types::Timeframe};
use tickerflow_data::{load_tickers, AlpacaData, CsvBars};
use tickerflow_pipeline::{ingest_window, IngestJob};
use tickerflow_store::Store;

use crate::cli::IngestArgs;

pub async fn run(args: IngestArgs, config: &AppConfig) -> Result<()> {
    let store = Store::connect(&config.database).await?;
    store
        .ensure_schema([
            config.trend.ema_fast,
            config.trend.ema_mid,
            config.trend.ema_slow,
        ])
        .await?;

    let tickers = load_tickers(Path::new(&config.ingest.tickers_file))?;

    let provider_name = args
        .provider
        .unwrap_or_else(|| config.ingest.provider.clone());
    let provider: Box<dyn BarProvider> = match provider_name.as_str() {
        "alpaca" => Box::new(AlpacaData::from_env()?),
        "csv" => Box::new(CsvBars::new(&config.ingest.csv_dir)),
        other => anyhow::bail!("unknown bar provider: {other}"),
    };

    let timeframe = config
        .ingest
        .timeframe
        .parse::<Timeframe>()
        .map_err(anyhow::Error::msg)?;
    let days = args.days.unwrap_or(config.ingest.lookback_days);
    let (start, end) = ingest_window(days, Utc::now());

    let report = IngestJob::new(&store, provider.as_ref())
        .run(&tickers, timeframe, start, end)
        .await?;
    println!("{}", report.summary());

    Ok(())
}
