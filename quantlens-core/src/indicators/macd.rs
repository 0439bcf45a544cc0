//! MACD: difference of a fast and slow EMA of close, with a signal line.
//!
//! MACD = EMA(close, fast) - EMA(close, slow)
//! Signal = EMA(MACD, signal)
//! MACD_Hist = MACD - Signal
//!
//! Every EMA is seeded with its first input, so all three columns are defined
//! from index 0. Lookback: 0.

use crate::domain::{Bar, PriceField};
use crate::error::EngineError;
use crate::indicator::{Column, Indicator, IndicatorOutput};
use crate::indicators::ema::ema;

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Result<Self, EngineError> {
        if fast == 0 || slow == 0 || signal == 0 {
            return Err(EngineError::invalid("MACD", "periods must be >= 1"));
        }
        if fast >= slow {
            return Err(EngineError::invalid(
                "MACD",
                format!("fast period ({fast}) must be shorter than slow period ({slow})"),
            ));
        }
        Ok(Self { fast, slow, signal })
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        "MACD"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn columns(&self) -> Vec<String> {
        vec!["MACD".into(), "Signal".into(), "MACD_Hist".into()]
    }

    fn compute(&self, bars: &[Bar]) -> IndicatorOutput {
        let closes = PriceField::Close.extract(bars);
        let fast = ema(&closes, self.fast);
        let slow = ema(&closes, self.slow);

        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema(&macd, self.signal);
        let hist: Vec<f64> = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

        let defined = |v: Vec<f64>| v.into_iter().map(Some).collect::<Vec<_>>();
        IndicatorOutput::new(vec![
            Column::new("MACD", defined(macd)),
            Column::new("Signal", defined(signal)),
            Column::new("MACD_Hist", defined(hist)),
        ])
    }
}
