//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Four columns from one rolling window over close:
//! - BB_Middle: SMA(close, period)
//! - BB_Std: sample stddev(close, period) (divide by N - 1)
//! - BB_Upper: middle + mult * std
//! - BB_Lower: middle - mult * std
//!
//! Lookback: period - 1.

use crate::domain::{Bar, PriceField};
use crate::error::EngineError;
use crate::indicator::{Column, Indicator, IndicatorOutput};
use crate::indicators::rolling::RollingWindow;

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64) -> Result<Self, EngineError> {
        if period < 2 {
            return Err(EngineError::invalid(
                "Bollinger",
                "period must be >= 2 (sample stddev needs two observations)",
            ));
        }
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(EngineError::invalid(
                "Bollinger",
                format!("multiplier must be finite and >= 0, got {multiplier}"),
            ));
        }
        Ok(Self { period, multiplier })
    }
}

impl Default for Bollinger {
    fn default() -> Self {
        Self {
            period: 20,
            multiplier: 2.0,
        }
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        "Bollinger"
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn columns(&self) -> Vec<String> {
        vec![
            "BB_Middle".into(),
            "BB_Std".into(),
            "BB_Upper".into(),
            "BB_Lower".into(),
        ]
    }

    fn compute(&self, bars: &[Bar]) -> IndicatorOutput {
        let n = bars.len();
        let mut middle = vec![None; n];
        let mut std = vec![None; n];
        let mut upper = vec![None; n];
        let mut lower = vec![None; n];

        let mut window = RollingWindow::new(self.period);
        for (i, close) in PriceField::Close.extract(bars).into_iter().enumerate() {
            window.push(close);
            if !window.is_full() {
                continue;
            }
            let (Some(mean), Some(sd)) = (window.mean(), window.sample_std()) else {
                continue;
            };
            let width = self.multiplier * sd;
            middle[i] = Some(mean);
            std[i] = Some(sd);
            upper[i] = Some(mean + width);
            lower[i] = Some(mean - width);
        }

        IndicatorOutput::new(vec![
            Column::new("BB_Middle", middle),
            Column::new("BB_Std", std),
            Column::new("BB_Upper", upper),
            Column::new("BB_Lower", lower),
        ])
    }
}
