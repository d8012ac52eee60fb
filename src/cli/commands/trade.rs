//! Trade dispatch command.

use anyhow::Result;
use tickerflow_broker::{AlpacaBroker, AlpacaConfig, SimBroker};
use tickerflow_config::AppConfig;
use tickerflow_core::traits::Broker;
use tickerflow_pipeline::TradeJob;
use tickerflow_store::Store;

use crate::cli::TradeArgs;

pub async fn run(args: TradeArgs, config: &AppConfig) -> Result<()> {
    let store = Store::connect(&config.database).await?;
    store
        .ensure_schema([
            config.trend.ema_fast,
            config.trend.ema_mid,
            config.trend.ema_slow,
        ])
        .await?;

    let dry_run = args.dry_run || config.trading.dry_run;
    let broker: Box<dyn Broker> = if dry_run {
        Box::new(SimBroker::new())
    } else {
        // The config file decides paper vs live; credentials come from the
        // environment.
        let alpaca_config = AlpacaConfig {
            paper: config.alpaca.paper,
            ..AlpacaConfig::from_env()?
        };
        Box::new(AlpacaBroker::new(alpaca_config)?)
    };

    let report = TradeJob::new(&store, broker.as_ref(), config.trading.quantity)
        .run()
        .await?;
    println!("{}", report.summary());

    Ok(())
}
