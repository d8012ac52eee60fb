//! Core types and traits for the bar/indicator/signal pipeline.
//!
//! This crate provides the foundational building blocks:
//! - Market data types ([`Bar`], [`TickerSeries`])
//! - Order types and the append-only order record
//! - Closed signal enums ([`Trend`], [`Reversion`]) and derived row types
//! - The error taxonomy shared across the pipeline
//! - Traits for the brokerage gateway and market-data providers

pub mod error;
pub mod traits;
pub mod types;

pub use error::{PipelineError, PipelineResult};
pub use traits::*;
pub use types::*;
