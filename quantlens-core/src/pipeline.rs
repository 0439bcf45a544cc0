//! Indicator pipeline: evaluate every group over one series and merge.
//!
//! Groups only read the original OHLCV fields and write disjoint columns, so
//! the application order is free. Outputs are merged in the pipeline's
//! declared layout regardless of the order (or thread) they were computed in.

use crate::config::IndicatorConfig;
use crate::data::validate_bars;
use crate::domain::Bar;
use crate::error::EngineError;
use crate::indicator::{Indicator, IndicatorOutput, IndicatorValues};
use crate::indicators::{Bollinger, DegeneratePolicy, Kdj, Macd, MovingAverage, Rsi};
use crate::series::{Diagnostic, EnrichedSeries};
use rayon::prelude::*;
use tracing::debug;

/// Compute every indicator with the default parameters.
pub fn calculate_all_indicators(bars: &[Bar]) -> Result<EnrichedSeries, EngineError> {
    IndicatorPipeline::from_config(&IndicatorConfig::default())?.run(bars)
}

pub struct IndicatorPipeline {
    groups: Vec<Box<dyn Indicator>>,
    /// Application order as indices into `groups`.
    order: Vec<usize>,
    policy: DegeneratePolicy,
}

impl IndicatorPipeline {
    /// Pipeline over explicit groups, applied and merged in the given order.
    pub fn new(groups: Vec<Box<dyn Indicator>>, policy: DegeneratePolicy) -> Self {
        let order = (0..groups.len()).collect();
        Self {
            groups,
            order,
            policy,
        }
    }

    /// The six standard groups: MA, MACD, RSI, Bollinger, KDJ, Volume MA.
    pub fn from_config(config: &IndicatorConfig) -> Result<Self, EngineError> {
        let policy = config.degenerate_policy;
        let groups: Vec<Box<dyn Indicator>> = vec![
            Box::new(MovingAverage::close(&config.ma.periods)?),
            Box::new(Macd::new(
                config.macd.fast,
                config.macd.slow,
                config.macd.signal,
            )?),
            Box::new(Rsi::new(config.rsi.period, policy)?),
            Box::new(Bollinger::new(
                config.bollinger.period,
                config.bollinger.multiplier,
            )?),
            Box::new(Kdj::new(config.kdj.n, config.kdj.m1, config.kdj.m2, policy)?),
            Box::new(MovingAverage::volume(&config.volume_ma.periods)?),
        ];
        Ok(Self::new(groups, policy))
    }

    /// Change the application order. `order` must be a permutation of
    /// `0..group_count()`; the merged column layout is unaffected.
    pub fn with_order(mut self, order: &[usize]) -> Result<Self, EngineError> {
        let mut sorted = order.to_vec();
        sorted.sort_unstable();
        if sorted != (0..self.groups.len()).collect::<Vec<_>>() {
            return Err(EngineError::invalid(
                "pipeline",
                format!(
                    "order {order:?} is not a permutation of {} groups",
                    self.groups.len()
                ),
            ));
        }
        self.order = order.to_vec();
        Ok(self)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name()).collect()
    }

    /// Every output column, in merged order.
    pub fn column_names(&self) -> Vec<String> {
        self.groups.iter().flat_map(|g| g.columns()).collect()
    }

    /// Bars needed before every column of every group is defined.
    pub fn warmup(&self) -> usize {
        self.groups.iter().map(|g| g.lookback()).max().unwrap_or(0)
    }

    /// Sequential evaluation.
    pub fn run(&self, bars: &[Bar]) -> Result<EnrichedSeries, EngineError> {
        validate_bars(bars)?;
        let mut outputs: Vec<Option<IndicatorOutput>> = vec![None; self.groups.len()];
        for &idx in &self.order {
            outputs[idx] = Some(self.evaluate(idx, bars));
        }
        self.merge(bars, outputs)
    }

    /// Evaluate groups concurrently on the rayon pool. Output is identical to
    /// [`IndicatorPipeline::run`].
    pub fn run_parallel(&self, bars: &[Bar]) -> Result<EnrichedSeries, EngineError> {
        validate_bars(bars)?;
        let computed: Vec<(usize, IndicatorOutput)> = self
            .order
            .par_iter()
            .map(|&idx| (idx, self.evaluate(idx, bars)))
            .collect();

        let mut outputs: Vec<Option<IndicatorOutput>> = vec![None; self.groups.len()];
        for (idx, output) in computed {
            outputs[idx] = Some(output);
        }
        self.merge(bars, outputs)
    }

    fn evaluate(&self, idx: usize, bars: &[Bar]) -> IndicatorOutput {
        let group = &self.groups[idx];
        let output = group.compute(bars);
        debug_assert_eq!(
            output.columns.iter().map(|c| c.name.clone()).collect::<Vec<_>>(),
            group.columns(),
            "indicator '{}' returned unexpected columns",
            group.name()
        );
        debug!(
            indicator = group.name(),
            bars = bars.len(),
            columns = output.columns.len(),
            degenerate = output.degenerate_cells,
            "computed indicator group"
        );
        output
    }

    fn merge(
        &self,
        bars: &[Bar],
        outputs: Vec<Option<IndicatorOutput>>,
    ) -> Result<EnrichedSeries, EngineError> {
        let mut values = IndicatorValues::new();
        let mut diagnostics = Vec::new();

        for (group, output) in self.groups.iter().zip(outputs) {
            let Some(output) = output else {
                continue;
            };

            let required = group.lookback() + 1;
            if bars.len() < required {
                diagnostics.push(Diagnostic::InsufficientData {
                    indicator: group.name().to_string(),
                    required,
                    available: bars.len(),
                });
            }
            if output.degenerate_cells > 0 {
                diagnostics.push(Diagnostic::DegenerateWindow {
                    indicator: group.name().to_string(),
                    count: output.degenerate_cells,
                    policy: self.policy,
                });
            }

            for column in output.columns {
                debug_assert_eq!(column.values.len(), bars.len());
                values.insert(column)?;
            }
        }

        debug!(
            bars = bars.len(),
            columns = values.len(),
            diagnostics = diagnostics.len(),
            "merged indicator columns"
        );
        Ok(EnrichedSeries::new(bars.to_vec(), values, diagnostics))
    }
}

impl Default for IndicatorPipeline {
    fn default() -> Self {
        Self::new(
            vec![
                Box::new(MovingAverage::standard_close()),
                Box::new(Macd::default()),
                Box::new(Rsi::default()),
                Box::new(Bollinger::default()),
                Box::new(Kdj::default()),
                Box::new(MovingAverage::standard_volume()),
            ],
            DegeneratePolicy::default(),
        )
    }
}
