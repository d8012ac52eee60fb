//! Trend-following classification from an EMA stack and ADX.
//!
//! A bar is an uptrend when the fast EMA sits above the mid, the mid
//! above the slow, the close above the fast EMA, and ADX clears the
//! strength threshold. A downtrend mirrors every comparison. Anything
//! else, including any NaN input, is neutral.

use serde::{Deserialize, Serialize};
use tickerflow_core::{
    error::IndicatorError,
    types::{SignalRow, TickerSeries, Trend, TrendIndicatorRow},
};
use tickerflow_indicators::{Adx, AdxOutput, Ema};

/// Parameters for the trend-following family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendParams {
    /// Fast EMA span
    pub ema_fast: u32,
    /// Mid EMA span
    pub ema_mid: u32,
    /// Slow EMA span
    pub ema_slow: u32,
    /// ADX smoothing span
    pub adx_span: u32,
    /// Minimum ADX for a directional call
    pub adx_threshold: f64,
}

impl Default for TrendParams {
    fn default() -> Self {
        Self {
            ema_fast: 10,
            ema_mid: 20,
            ema_slow: 50,
            adx_span: 14,
            adx_threshold: 25.0,
        }
    }
}

impl TrendParams {
    pub fn validate(&self) -> Result<(), IndicatorError> {
        if self.ema_fast == 0 {
            return Err(IndicatorError::InvalidParameter(
                "Fast EMA span must be greater than 0".into(),
            ));
        }
        if self.ema_fast >= self.ema_mid || self.ema_mid >= self.ema_slow {
            return Err(IndicatorError::InvalidParameter(
                "EMA spans must be strictly increasing (fast < mid < slow)".into(),
            ));
        }
        if self.adx_span == 0 {
            return Err(IndicatorError::InvalidParameter(
                "ADX span must be greater than 0".into(),
            ));
        }
        if self.adx_threshold <= 0.0 {
            return Err(IndicatorError::InvalidParameter(
                "ADX threshold must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Classify one bar. All comparisons are strict, so a NaN in any
    /// input fails both branches and the bar comes out neutral.
    pub fn classify(&self, close: f64, ema_fast: f64, ema_mid: f64, ema_slow: f64, adx: f64) -> Trend {
        let strong = adx > self.adx_threshold;
        if ema_fast > ema_mid && ema_mid > ema_slow && close > ema_fast && strong {
            Trend::Uptrend
        } else if ema_fast < ema_mid && ema_mid < ema_slow && close < ema_fast && strong {
            Trend::Downtrend
        } else {
            Trend::Neutral
        }
    }
}

/// Compute the full trend indicator table for one ticker's series.
///
/// Output rows are aligned one-to-one with the input bars and carry the
/// original OHLCV columns alongside the derived ones.
pub fn enrich_trend(
    series: &TickerSeries,
    params: &TrendParams,
) -> Result<Vec<TrendIndicatorRow>, IndicatorError> {
    params.validate()?;

    let bars = series.bars();
    if bars.is_empty() {
        return Ok(Vec::new());
    }

    let closes = series.closes();
    let ema_fast = Ema::new(params.ema_fast).calculate(&closes);
    let ema_mid = Ema::new(params.ema_mid).calculate(&closes);
    let ema_slow = Ema::new(params.ema_slow).calculate(&closes);
    let AdxOutput {
        adx,
        plus_di,
        minus_di,
    } = Adx::new(params.adx_span).calculate(bars);

    let mut rows = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let trend = params.classify(bar.close, ema_fast[i], ema_mid[i], ema_slow[i], adx[i]);
        rows.push(TrendIndicatorRow {
            timestamp: bar.timestamp,
            ticker: series.ticker().to_string(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            ema_fast: ema_fast[i],
            ema_mid: ema_mid[i],
            ema_slow: ema_slow[i],
            adx: adx[i],
            plus_di: plus_di[i],
            minus_di: minus_di[i],
            trend,
        });
    }
    Ok(rows)
}

/// Project trend indicator rows onto the unified signal table. Only the
/// trend column is filled; the reversion column is left untouched by
/// the upsert.
pub fn trend_signal_rows(rows: &[TrendIndicatorRow]) -> Vec<SignalRow> {
    rows.iter()
        .map(|row| SignalRow {
            timestamp: row.timestamp,
            ticker: row.ticker.clone(),
            close: row.close,
            trend: Some(row.trend),
            signal: None,
        })
        .collect()
}
