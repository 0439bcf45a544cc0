//! Simple moving averages over one price field.
//!
//! One group instance covers a set of window sizes. `MA{p}` averages close,
//! `Volume_MA{p}` averages volume; the arithmetic is identical.
//! Lookback: max(period) - 1 (first valid value at index period-1).

use crate::domain::{Bar, PriceField};
use crate::error::EngineError;
use crate::indicator::{Column, Indicator, IndicatorOutput};
use crate::indicators::rolling::rolling_mean;

#[derive(Debug, Clone)]
pub struct MovingAverage {
    source: PriceField,
    periods: Vec<usize>,
    name: String,
    prefix: String,
}

impl MovingAverage {
    /// `MA{p}` over close for each period.
    pub fn close(periods: &[usize]) -> Result<Self, EngineError> {
        Self::new("MA", PriceField::Close, "MA", periods)
    }

    /// `Volume_MA{p}` over volume for each period.
    pub fn volume(periods: &[usize]) -> Result<Self, EngineError> {
        Self::new("Volume_MA", PriceField::Volume, "Volume_MA", periods)
    }

    fn new(
        name: &str,
        source: PriceField,
        prefix: &str,
        periods: &[usize],
    ) -> Result<Self, EngineError> {
        if periods.iter().any(|&p| p == 0) {
            return Err(EngineError::invalid(name, "periods must be >= 1"));
        }
        let mut seen = periods.to_vec();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != periods.len() {
            return Err(EngineError::invalid(name, "periods must be distinct"));
        }
        Ok(Self::build(name, source, prefix, periods))
    }

    fn build(name: &str, source: PriceField, prefix: &str, periods: &[usize]) -> Self {
        Self {
            source,
            periods: periods.to_vec(),
            name: name.to_string(),
            prefix: prefix.to_string(),
        }
    }

    /// `MA5`, `MA10`, `MA20`, `MA60`.
    pub fn standard_close() -> Self {
        Self::build("MA", PriceField::Close, "MA", &[5, 10, 20, 60])
    }

    /// `Volume_MA5`, `Volume_MA10`, `Volume_MA20`.
    pub fn standard_volume() -> Self {
        Self::build("Volume_MA", PriceField::Volume, "Volume_MA", &[5, 10, 20])
    }

    pub fn periods(&self) -> &[usize] {
        &self.periods
    }

    pub fn source(&self) -> PriceField {
        self.source
    }
}

impl Indicator for MovingAverage {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.periods
            .iter()
            .max()
            .map(|p| p.saturating_sub(1))
            .unwrap_or(0)
    }

    fn columns(&self) -> Vec<String> {
        self.periods
            .iter()
            .map(|p| format!("{}{p}", self.prefix))
            .collect()
    }

    fn compute(&self, bars: &[Bar]) -> IndicatorOutput {
        let values = self.source.extract(bars);
        let columns = self
            .columns()
            .into_iter()
            .zip(&self.periods)
            .map(|(name, &period)| Column::new(name, rolling_mean(&values, period)))
            .collect();
        IndicatorOutput::new(columns)
    }
}
