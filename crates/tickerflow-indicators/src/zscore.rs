//! Rolling z-score.

/// Rolling z-score of close prices over a trailing window.
///
/// The first `window - 1` rows are NaN (insufficient history), a
/// zero-variance window yields NaN, and any NaN inside the trailing
/// window poisons that row's output. Standard deviation is the sample
/// statistic (denominator `window - 1`).
#[derive(Debug, Clone)]
pub struct RollingZScore {
    window: usize,
}

impl RollingZScore {
    /// Create a new rolling z-score with the specified window.
    pub fn new(window: usize) -> Self {
        assert!(window >= 2, "Window must be at least 2");
        Self { window }
    }

    /// Compute the z-score over a single ticker's close series.
    pub fn calculate(&self, closes: &[f64]) -> Vec<f64> {
        let mut out = vec![f64::NAN; closes.len()];
        if closes.len() < self.window {
            return out;
        }

        let w = self.window as f64;
        for (i, win) in closes.windows(self.window).enumerate() {
            let idx = i + self.window - 1;
            let mean = win.iter().sum::<f64>() / w;
            let var = win
                .iter()
                .map(|x| {
                    let d = x - mean;
                    d * d
                })
                .sum::<f64>()
                / (w - 1.0);
            // A flat window divides 0 by 0 here and yields NaN
            out[idx] = (closes[idx] - mean) / var.sqrt();
        }

        out
    }
}
