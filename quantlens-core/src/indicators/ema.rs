//! Exponential smoothing.
//!
//! Recursive: EMA[t] = EMA[t-1] + alpha * (x[t] - EMA[t-1]), which equals
//! alpha * x[t] + (1 - alpha) * EMA[t-1] and keeps a constant input exact.
//! Seed: EMA[0] = x[0] (first observed value, no warm-up gap).
//!
//! `ema` uses the span convention alpha = 2 / (N + 1) (MACD); `ewm` takes
//! alpha directly (KDJ uses alpha = 1 / m).

/// EMA of a fully-defined series with span `period`.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    debug_assert!(period >= 1, "EMA period must be >= 1");
    ewm(values, 2.0 / (period as f64 + 1.0))
}

/// Exponentially weighted mean with smoothing factor `alpha`.
pub fn ewm(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut result = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &v in values {
        let next = match prev {
            None => v,
            Some(p) => p + alpha * (v - p),
        };
        result.push(next);
        prev = Some(next);
    }
    result
}

/// Exponentially weighted mean over a series with undefined cells.
///
/// Seeded at the first defined value; cells before it stay undefined. An
/// undefined cell after the seed leaves the state untouched and emits no
/// value for that bar.
pub fn ewm_optional(values: &[Option<f64>], alpha: f64) -> Vec<Option<f64>> {
    let mut prev: Option<f64> = None;
    values
        .iter()
        .map(|v| {
            let x = (*v)?;
            let next = match prev {
                None => x,
                Some(p) => p + alpha * (x - p),
            };
            prev = Some(next);
            Some(next)
        })
        .collect()
}
