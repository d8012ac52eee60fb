//! Derived table row types.
//!
//! Undefined numeric values (indicator warmup, zero-variance windows)
//! are `f64::NAN` here and become SQL NULL when persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Reversion, Trend};

/// Row of the trend-following indicator table: a bar extended with the
/// EMA stack, the directional-movement outputs, and its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendIndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub ticker: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub ema_fast: f64,
    pub ema_mid: f64,
    pub ema_slow: f64,
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub trend: Trend,
}

/// Row of the mean-reversion indicator table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReversionIndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub ticker: String,
    pub close: f64,
    pub z_score: f64,
    pub signal: Reversion,
}

/// Row of the unified signal table consumed by the order dispatcher.
///
/// Each strategy family fills only its own column when upserting, so a
/// row may carry either label or both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRow {
    pub timestamp: DateTime<Utc>,
    pub ticker: String,
    pub close: f64,
    pub trend: Option<Trend>,
    pub signal: Option<Reversion>,
}
