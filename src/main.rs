//! Bar pipeline CLI application.

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use tickerflow_config::load_config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    let level = cli
        .log_level
        .map(|l| l.as_str())
        .unwrap_or(config.logging.level.as_str());
    let _guard = logging::setup_logging(
        level,
        cli.json_logs || config.logging.json,
        config.logging.file_dir.as_deref(),
        &config.logging.file_prefix,
    );

    match cli.command {
        Commands::InitDb => cli::commands::init_db::run(&config).await,
        Commands::Ingest(args) => cli::commands::ingest::run(args, &config).await,
        Commands::Enrich(args) => cli::commands::enrich::run(args, &config).await,
        Commands::Trade(args) => cli::commands::trade::run(args, &config).await,
        Commands::Status => cli::commands::status::run(&config).await,
        Commands::ResetDb(args) => cli::commands::reset_db::run(args, &config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&config).await,
    }
}
