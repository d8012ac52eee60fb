//! Batch jobs tying the pipeline together.
//!
//! Three jobs mirror the three batch commands: [`IngestJob`] pulls raw
//! bars from a provider into the store, [`EnrichJob`] recomputes
//! indicator tables and signal projections from those bars, and
//! [`TradeJob`] turns each ticker's latest signal row into a market
//! order. Every job returns a [`RunReport`] of per-subject outcomes.

mod enrich;
mod ingest;
mod report;
mod retry;
mod trade;

pub use enrich::{EnrichJob, Family};
pub use ingest::{ingest_window, IngestJob};
pub use report::{RunFailure, RunReport};
pub use retry::{with_retry, RetryPolicy};
pub use trade::{plan_orders, resolve_side, PlannedOrder, TradeJob};
