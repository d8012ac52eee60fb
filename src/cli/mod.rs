//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tickerflow")]
#[command(author, version, about = "Equity bar pipeline: ingest, enrich, trade")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level override (defaults to the configured level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the pipeline tables
    InitDb,
    /// Fetch raw bars into the store
    Ingest(IngestArgs),
    /// Compute indicators and signals from stored bars
    Enrich(EnrichArgs),
    /// Dispatch orders from the latest signals
    Trade(TradeArgs),
    /// Data-quality summary of the store
    Status,
    /// Drop pipeline tables
    ResetDb(ResetDbArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct IngestArgs {
    /// Bar provider override (alpaca, csv)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Lookback window override in days
    #[arg(short, long)]
    pub days: Option<u32>,
}

#[derive(clap::Args)]
pub struct EnrichArgs {
    /// Signal family to compute (trend, reversion, all)
    #[arg(short, long, default_value = "all")]
    pub family: String,
}

#[derive(clap::Args)]
pub struct TradeArgs {
    /// Route orders to the in-process simulator instead of the broker
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(clap::Args)]
pub struct ResetDbArgs {
    /// Required acknowledgement; the command refuses to run without it
    #[arg(long)]
    pub confirm: bool,

    /// Also drop the raw bars table
    #[arg(long)]
    pub bars: bool,
}
