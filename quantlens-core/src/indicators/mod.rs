//! Concrete indicator groups.
//!
//! Six groups implement the `Indicator` trait from `crate::indicator`:
//! moving averages, MACD, RSI, Bollinger Bands, KDJ and volume moving
//! averages. Each group reads only the original OHLCV fields.
//!
//! Zero-denominator windows (RSI with no losses, KDJ with a flat high/low
//! range) never leak NaN or infinity; they resolve through
//! [`DegeneratePolicy`].

pub mod bollinger;
pub mod ema;
pub mod kdj;
pub mod macd;
pub mod rolling;
pub mod rsi;
pub mod sma;

pub use bollinger::Bollinger;
pub use ema::{ema, ewm, ewm_optional};
pub use kdj::Kdj;
pub use macd::Macd;
pub use rolling::{Extreme, RollingExtreme, RollingWindow};
pub use rsi::Rsi;
pub use sma::MovingAverage;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value used for oscillators when the window carries no directional
/// information (RSI with no movement, KDJ with high == low).
pub const NEUTRAL_LEVEL: f64 = 50.0;

/// Fallback for zero-denominator windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Emit the neutral level (50).
    #[default]
    Neutral,
    /// Emit no value for the cell.
    Undefined,
}

impl DegeneratePolicy {
    pub(crate) fn resolve(&self) -> Option<f64> {
        match self {
            DegeneratePolicy::Neutral => Some(NEUTRAL_LEVEL),
            DegeneratePolicy::Undefined => None,
        }
    }
}

impl fmt::Display for DegeneratePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegeneratePolicy::Neutral => f.write_str("neutral"),
            DegeneratePolicy::Undefined => f.write_str("undefined"),
        }
    }
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar::new(
                base + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                1000.0,
            )
        })
        .collect()
}

/// Create bars from explicit (high, low, close) triples; open = close.
#[cfg(test)]
pub fn make_hlc_bars(hlc: &[(f64, f64, f64)]) -> Vec<crate::domain::Bar> {
    let mut bars = make_bars(&hlc.iter().map(|t| t.2).collect::<Vec<_>>());
    for (bar, &(high, low, close)) in bars.iter_mut().zip(hlc) {
        bar.open = close;
        bar.high = high;
        bar.low = low;
    }
    bars
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
