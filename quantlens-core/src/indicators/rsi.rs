//! Relative Strength Index (RSI).
//!
//! Simple rolling means of gains and losses (not Wilder smoothing):
//! delta[i] = close[i] - close[i-1]
//! avg_gain[i] = mean(max(delta, 0)) over deltas i-period+1..=i
//! avg_loss[i] = mean(max(-delta, 0)) over the same deltas
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period (the first delta exists at index 1).
//!
//! Edge cases: avg_loss == 0 with avg_gain > 0 → RSI = 100; avg_loss ==
//! avg_gain == 0 (no movement) → resolved by `DegeneratePolicy`. Only the
//! no-movement cells are counted as degenerate.

use crate::domain::{Bar, PriceField};
use crate::error::EngineError;
use crate::indicator::{Column, Indicator, IndicatorOutput};
use crate::indicators::rolling::RollingWindow;
use crate::indicators::DegeneratePolicy;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    policy: DegeneratePolicy,
}

impl Rsi {
    pub fn new(period: usize, policy: DegeneratePolicy) -> Result<Self, EngineError> {
        if period == 0 {
            return Err(EngineError::invalid("RSI", "period must be >= 1"));
        }
        Ok(Self { period, policy })
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self {
            period: 14,
            policy: DegeneratePolicy::default(),
        }
    }
}

/// Full-window mean of non-negative gains or losses.
///
/// A window of all zeros is a flat window, so its mean is exactly zero.
fn side_mean(window: &RollingWindow) -> Option<f64> {
    if !window.is_full() {
        return None;
    }
    window.mean().map(|m| m.max(0.0))
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        "RSI"
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn columns(&self) -> Vec<String> {
        vec!["RSI".into()]
    }

    fn compute(&self, bars: &[Bar]) -> IndicatorOutput {
        let closes = PriceField::Close.extract(bars);
        let mut result = vec![None; closes.len()];
        let mut degenerate = 0;

        let mut gains = RollingWindow::new(self.period);
        let mut losses = RollingWindow::new(self.period);

        for i in 1..closes.len() {
            let delta = closes[i] - closes[i - 1];
            gains.push(delta.max(0.0));
            losses.push((-delta).max(0.0));

            let (Some(avg_gain), Some(avg_loss)) = (side_mean(&gains), side_mean(&losses))
            else {
                continue;
            };
            if avg_loss == 0.0 && avg_gain == 0.0 {
                degenerate += 1;
            }
            result[i] = compute_rsi(avg_gain, avg_loss, self.policy);
        }

        IndicatorOutput {
            columns: vec![Column::new("RSI", result)],
            degenerate_cells: degenerate,
        }
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64, policy: DegeneratePolicy) -> Option<f64> {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        policy.resolve() // no movement
    } else if avg_loss == 0.0 {
        Some(100.0)
    } else {
        let rs = avg_gain / avg_loss;
        Some(100.0 - 100.0 / (1.0 + rs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars};

    #[test]
    fn rsi_all_gains() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let out = Rsi::new(3, DegeneratePolicy::Neutral).unwrap().compute(&bars);
        // All positive changes → RSI = 100
        assert_approx(out.columns[0].values[3].unwrap(), 100.0, 1e-6);
        // a loss-free window has a defined limit, not a degenerate one
        assert_eq!(out.degenerate_cells, 0);
    }

    #[test]
    fn rsi_all_losses() {
        let bars = make_bars(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let out = Rsi::new(3, DegeneratePolicy::Neutral).unwrap().compute(&bars);
        // All negative changes → RSI = 0
        assert_approx(out.columns[0].values[3].unwrap(), 0.0, 1e-6);
        assert_eq!(out.degenerate_cells, 0);
    }

    #[test]
    fn rsi_mixed() {
        // Closes: 44, 44.34, 44.09, 43.61, 44.33
        // Changes: +0.34, -0.25, -0.48, +0.72
        // RSI[3]: gains 0.34, losses 0.73 → 100 - 100/(1 + 0.34/0.73)
        // RSI[4]: gains 0.72, losses 0.73 → 100 - 100/(1 + 0.72/0.73)
        let bars = make_bars(&[44.0, 44.34, 44.09, 43.61, 44.33]);
        let out = Rsi::new(3, DegeneratePolicy::Neutral).unwrap().compute(&bars);
        let result = &out.columns[0].values;

        assert!(result[0].is_none());
        assert!(result[1].is_none());
        assert!(result[2].is_none());
        assert_approx(result[3].unwrap(), 100.0 - 100.0 / (1.0 + 0.34 / 0.73), 1e-9);
        assert_approx(result[4].unwrap(), 100.0 - 100.0 / (1.0 + 0.72 / 0.73), 1e-9);
    }

    #[test]
    fn rsi_bounds() {
        let bars = make_bars(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let out = Rsi::new(3, DegeneratePolicy::Neutral).unwrap().compute(&bars);
        for (i, v) in out.columns[0].values.iter().enumerate() {
            if let Some(v) = v {
                assert!((0.0..=100.0).contains(v), "RSI out of bounds at bar {i}: {v}");
            }
        }
    }

    #[test]
    fn flat_series_follows_policy() {
        let bars = make_bars(&[100.0; 20]);
        let neutral = Rsi::new(14, DegeneratePolicy::Neutral).unwrap().compute(&bars);
        assert_eq!(neutral.columns[0].values[14], Some(50.0));
        assert_eq!(neutral.degenerate_cells, 6);

        let undefined = Rsi::new(14, DegeneratePolicy::Undefined).unwrap().compute(&bars);
        assert!(undefined.columns[0].values.iter().all(Option::is_none));
    }

    #[test]
    fn flat_after_rise_is_exactly_neutral() {
        // the gains leave the window entirely; avg_gain must be exactly 0
        let mut closes = vec![100.1, 100.2, 100.3, 100.7];
        closes.extend([100.7; 5]);
        let bars = make_bars(&closes);
        let out = Rsi::new(3, DegeneratePolicy::Neutral).unwrap().compute(&bars);
        assert_eq!(out.columns[0].values[8], Some(50.0));
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::default().lookback(), 14);
        assert!(Rsi::new(0, DegeneratePolicy::Neutral).is_err());
    }
}
