//! Exponential smoothing shared by the EMA and ADX computations.

/// Exponentially weighted mean with `alpha = 2 / (span + 1)`:
///
/// `s[0] = x[0]`, `s[t] = alpha * x[t] + (1 - alpha) * s[t-1]`
///
/// The state seeds at the first finite input. NaN inputs do not update
/// the state; the output at those positions is the value held so far
/// (NaN until the seed arrives).
pub fn ewm(values: &[f64], span: u32) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);

    let mut out = Vec::with_capacity(values.len());
    let mut state: Option<f64> = None;

    for &x in values {
        if x.is_nan() {
            out.push(state.unwrap_or(f64::NAN));
            continue;
        }
        let next = match state {
            None => x,
            Some(prev) => alpha * x + (1.0 - alpha) * prev,
        };
        state = Some(next);
        out.push(next);
    }

    out
}
