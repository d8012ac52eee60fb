//! Per-ticker time-series indicator computations.
//!
//! All outputs are aligned with their input: one value per row, with NaN
//! marking warmup rows and degenerate denominators. Nothing here raises
//! on numeric edge cases; undefined stays undefined and flows through.
//!
//! Callers are responsible for passing a single ticker's bars in
//! chronological order; [`tickerflow_core::TickerSeries`] provides that
//! ordering guarantee.

mod adx;
mod ema;
mod smoothing;
mod zscore;

pub use adx::{Adx, AdxOutput};
pub use ema::Ema;
pub use smoothing::ewm;
pub use zscore::RollingZScore;
