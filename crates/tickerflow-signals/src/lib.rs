//! Threshold rules converting indicator values into categorical signals.
//!
//! Two independent families: trend-following (EMA stack + ADX) and
//! mean-reversion (rolling z-score). Each exposes a parameter struct
//! with the standard defaults, a pure per-row classifier, and an
//! enrichment function that turns one ticker's bars into fully derived
//! indicator rows. Undefined indicator values always classify neutral,
//! since a NaN fails every threshold comparison.

mod reversion;
mod trend;

pub use reversion::{enrich_reversion, reversion_signal_rows, ReversionParams};
pub use trend::{enrich_trend, trend_signal_rows, TrendParams};
