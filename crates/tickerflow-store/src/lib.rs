//! Postgres persistence for the bar pipeline.
//!
//! One [`Store`] handle owns a connection pool and exposes the five
//! pipeline tables: raw `bars` (insert-only, duplicate keys dropped),
//! the per-family indicator tables (replaced wholesale each run), the
//! unified `signals` table (upserted per family column), and the
//! append-only `orders` record. Every multi-row write runs inside a
//! single transaction, so a failed batch leaves the previous contents
//! visible.
//!
//! Undefined numeric values cross this boundary as SQL NULL and come
//! back as `f64::NAN`.

mod admin;
mod bars;
mod config;
mod indicators;
mod orders;
mod signals;
mod status;
mod store;

pub use config::StoreConfig;
pub use status::{TableStatus, TickerStatus};
pub use store::Store;
