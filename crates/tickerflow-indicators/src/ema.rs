//! Exponential moving average.

use crate::smoothing::ewm;

/// Exponential Moving Average over close prices.
///
/// Seeded at the first close (`ema[0] = close[0]`) with
/// `alpha = 2 / (span + 1)`. Output is aligned with the input, one value
/// per row from the very first.
#[derive(Debug, Clone)]
pub struct Ema {
    span: u32,
}

impl Ema {
    /// Create a new EMA with the specified span.
    pub fn new(span: u32) -> Self {
        assert!(span > 0, "Span must be greater than 0");
        Self { span }
    }

    /// Compute the EMA over a close series.
    pub fn calculate(&self, closes: &[f64]) -> Vec<f64> {
        ewm(closes, self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_series_equals_close() {
        let ema = Ema::new(14);
        let closes = vec![42.5; 50];
        let out = ema.calculate(&closes);

        assert_eq!(out.len(), 50);
        for value in out {
            assert!((value - 42.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_span_three_recurrence() {
        let closes = [
            100.0, 102.0, 104.0, 103.0, 105.0, 107.0, 109.0, 108.0, 110.0, 112.0,
        ];
        let ema = Ema::new(3);
        let out = ema.calculate(&closes);

        assert_eq!(out.len(), closes.len());
        assert!((out[0] - 100.0).abs() < 1e-9);
        assert!((out[1] - 101.0).abs() < 1e-9); // 0.5*102 + 0.5*100

        // Every subsequent value matches the recurrence exactly
        let alpha = 2.0 / (3.0 + 1.0);
        let mut expected = closes[0];
        for (i, &close) in closes.iter().enumerate().skip(1) {
            expected = alpha * close + (1.0 - alpha) * expected;
            assert!(
                (out[i] - expected).abs() < 1e-9,
                "row {i}: {} vs {expected}",
                out[i]
            );
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(Ema::new(5).calculate(&[]).is_empty());
    }

    #[test]
    #[should_panic(expected = "Span must be greater than 0")]
    fn test_zero_span_panics() {
        Ema::new(0);
    }
}
