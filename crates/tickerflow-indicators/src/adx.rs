//! Average Directional Index and its directional indicators.

use crate::smoothing::ewm;
use tickerflow_core::types::Bar;

/// Public output columns of the ADX computation, aligned with the input
/// bars. True range, raw directional movement, and DX are scratch state
/// and are not exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct AdxOutput {
    pub adx: Vec<f64>,
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
}

/// Average Directional Index over a span.
///
/// True range and directional movement are smoothed with the same
/// span-based exponential recurrence as the EMA, the directional
/// indicators are ratios against ATR, and ADX is the smoothed DX. A zero
/// ATR or zero DI sum produces NaN, never an error.
#[derive(Debug, Clone)]
pub struct Adx {
    span: u32,
}

impl Adx {
    /// Create a new ADX with the specified span.
    pub fn new(span: u32) -> Self {
        assert!(span > 0, "Span must be greater than 0");
        Self { span }
    }

    /// Compute ADX, +DI and -DI over a chronologically ordered bar
    /// series for one ticker.
    pub fn calculate(&self, bars: &[Bar]) -> AdxOutput {
        let n = bars.len();
        let mut tr = Vec::with_capacity(n);
        let mut plus_dm = Vec::with_capacity(n);
        let mut minus_dm = Vec::with_capacity(n);

        for (i, bar) in bars.iter().enumerate() {
            let prev = if i > 0 { Some(&bars[i - 1]) } else { None };
            tr.push(bar.true_range(prev.map(|p| p.close)));

            let (up_move, down_move) = match prev {
                Some(prev) => (bar.high - prev.high, prev.low - bar.low),
                None => (0.0, 0.0),
            };
            // Only the strictly dominant positive move counts; a tie
            // zeroes both.
            plus_dm.push(if up_move > down_move && up_move > 0.0 {
                up_move
            } else {
                0.0
            });
            minus_dm.push(if down_move > up_move && down_move > 0.0 {
                down_move
            } else {
                0.0
            });
        }

        let atr = ewm(&tr, self.span);
        let plus_smooth = ewm(&plus_dm, self.span);
        let minus_smooth = ewm(&minus_dm, self.span);

        let mut plus_di = Vec::with_capacity(n);
        let mut minus_di = Vec::with_capacity(n);
        let mut dx = Vec::with_capacity(n);

        for i in 0..n {
            let (p, m) = if atr[i] == 0.0 || atr[i].is_nan() {
                (f64::NAN, f64::NAN)
            } else {
                (
                    100.0 * plus_smooth[i] / atr[i],
                    100.0 * minus_smooth[i] / atr[i],
                )
            };
            plus_di.push(p);
            minus_di.push(m);

            let denom = p + m;
            dx.push(if denom == 0.0 {
                f64::NAN
            } else {
                // NaN DIs flow through here as NaN DX
                100.0 * (p - m).abs() / denom
            });
        }

        let adx = ewm(&dx, self.span);

        AdxOutput {
            adx,
            plus_di,
            minus_di,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn bars_from_ohlc(rows: &[(f64, f64, f64)]) -> Vec<Bar> {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap();
        rows.iter()
            .enumerate()
            .map(|(i, &(high, low, close))| {
                Bar::new(
                    t0 + Duration::minutes(i as i64),
                    close,
                    high,
                    low,
                    close,
                    1_000,
                )
            })
            .collect()
    }

    /// Strictly rising closes, highs and lows with a constant one-point
    /// range: a pure uptrend with no negative directional movement.
    fn rising_bars(n: usize) -> Vec<Bar> {
        let rows: Vec<(f64, f64, f64)> = (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                (close + 0.5, close - 0.5, close)
            })
            .collect();
        bars_from_ohlc(&rows)
    }

    #[test]
    fn test_output_aligned_with_input() {
        let bars = rising_bars(40);
        let out = Adx::new(14).calculate(&bars);
        assert_eq!(out.adx.len(), 40);
        assert_eq!(out.plus_di.len(), 40);
        assert_eq!(out.minus_di.len(), 40);
    }

    #[test]
    fn test_pure_uptrend_directional_indicators() {
        let bars = rising_bars(60);
        let out = Adx::new(14).calculate(&bars);

        // Row 0 has no prior bar, so both DMs are zero there; from the
        // first real move onward +DI is positive and -DI stays at zero.
        for i in 1..60 {
            assert!(out.plus_di[i] > 0.0, "+di at {i}: {}", out.plus_di[i]);
            assert!(
                out.minus_di[i].abs() < 1e-12,
                "-di at {i}: {}",
                out.minus_di[i]
            );
        }
    }

    #[test]
    fn test_pure_uptrend_adx_rises_above_threshold() {
        let bars = rising_bars(60);
        let out = Adx::new(14).calculate(&bars);

        // DX is 100 in a one-sided trend, so the smoothed ADX converges
        // toward 100 and clears any reasonable threshold once warmed.
        assert!(out.adx[59] > 25.0, "adx: {}", out.adx[59]);
    }

    #[test]
    fn test_zero_range_series_propagates_nan() {
        // All bars identical with high == low == close: zero true range.
        let rows = vec![(50.0, 50.0, 50.0); 20];
        let bars = bars_from_ohlc(&rows);
        let out = Adx::new(14).calculate(&bars);

        for i in 0..20 {
            assert!(out.plus_di[i].is_nan());
            assert!(out.minus_di[i].is_nan());
            assert!(out.adx[i].is_nan());
        }
    }

    #[test]
    fn test_tied_moves_zero_both_dms() {
        // Second bar expands symmetrically: up_move == down_move == 1.0.
        // Neither direction dominates, so both DIs must be zero there.
        let rows = vec![(101.0, 99.0, 100.0), (102.0, 98.0, 100.0)];
        let bars = bars_from_ohlc(&rows);
        let out = Adx::new(14).calculate(&bars);

        assert!(out.plus_di[1].abs() < 1e-12);
        assert!(out.minus_di[1].abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        let out = Adx::new(14).calculate(&[]);
        assert!(out.adx.is_empty());
        assert!(out.plus_di.is_empty());
        assert!(out.minus_di.is_empty());
    }
}
