//! KDJ stochastic oscillator.
//!
//! low_n / high_n: min(low) / max(high) over the trailing `n` bars (full window)
//! RSV = (close - low_n) / (high_n - low_n) * 100
//! K = EWM(RSV, alpha = 1/m1), D = EWM(K, alpha = 1/m2), both seeded at
//! their first defined input
//! J = 3K - 2D (unbounded by construction)
//!
//! A flat window (high_n == low_n) has no range to locate close in; its RSV
//! comes from `DegeneratePolicy`. Lookback: n - 1.

use crate::domain::{Bar, PriceField};
use crate::error::EngineError;
use crate::indicator::{Column, Indicator, IndicatorOutput};
use crate::indicators::ema::ewm_optional;
use crate::indicators::rolling::{rolling_extreme, Extreme};
use crate::indicators::DegeneratePolicy;

#[derive(Debug, Clone)]
pub struct Kdj {
    n: usize,
    m1: usize,
    m2: usize,
    policy: DegeneratePolicy,
}

impl Kdj {
    pub fn new(n: usize, m1: usize, m2: usize, policy: DegeneratePolicy) -> Result<Self, EngineError> {
        if n == 0 {
            return Err(EngineError::invalid("KDJ", "RSV period must be >= 1"));
        }
        if m1 == 0 || m2 == 0 {
            return Err(EngineError::invalid("KDJ", "smoothing factors must be >= 1"));
        }
        Ok(Self { n, m1, m2, policy })
    }

    /// Raw stochastic value per bar, plus the number of flat windows hit.
    fn rsv(&self, bars: &[Bar]) -> (Vec<Option<f64>>, usize) {
        let lows = rolling_extreme(&PriceField::Low.extract(bars), self.n, Extreme::Min);
        let highs = rolling_extreme(&PriceField::High.extract(bars), self.n, Extreme::Max);

        let mut flat = 0;
        let rsv = bars
            .iter()
            .zip(lows.iter().zip(&highs))
            .map(|(bar, (low_n, high_n))| {
                let (low_n, high_n) = ((*low_n)?, (*high_n)?);
                let range = high_n - low_n;
                if range == 0.0 {
                    flat += 1;
                    return self.policy.resolve();
                }
                Some((bar.close - low_n) / range * 100.0)
            })
            .collect();
        (rsv, flat)
    }
}

impl Default for Kdj {
    fn default() -> Self {
        Self {
            n: 9,
            m1: 3,
            m2: 3,
            policy: DegeneratePolicy::default(),
        }
    }
}

impl Indicator for Kdj {
    fn name(&self) -> &str {
        "KDJ"
    }

    fn lookback(&self) -> usize {
        self.n - 1
    }

    fn columns(&self) -> Vec<String> {
        vec!["K".into(), "D".into(), "J".into()]
    }

    fn compute(&self, bars: &[Bar]) -> IndicatorOutput {
        let (rsv, flat) = self.rsv(bars);
        let k = ewm_optional(&rsv, 1.0 / self.m1 as f64);
        let d = ewm_optional(&k, 1.0 / self.m2 as f64);
        let j = k
            .iter()
            .zip(&d)
            .map(|(k, d)| Some(3.0 * (*k)? - 2.0 * (*d)?))
            .collect();

        IndicatorOutput {
            columns: vec![
                Column::new("K", k),
                Column::new("D", d),
                Column::new("J", j),
            ],
            degenerate_cells: flat,
        }
    }
}
