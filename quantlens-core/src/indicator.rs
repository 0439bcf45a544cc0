//! Indicator trait and the column container indicators write into.
//!
//! Indicators are pure functions: bar history in, named numeric columns out.
//! Each one reads only the original OHLCV fields, never another indicator's
//! output, so groups can be evaluated in any order (or concurrently) and
//! merged.

use crate::domain::Bar;
use crate::error::EngineError;

/// One derived column, positionally aligned with the input bars.
///
/// `None` marks a cell with no value (warm-up or an undefined window). It is
/// never conflated with a computed zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Number of cells holding a value.
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Index of the first defined cell.
    pub fn first_defined(&self) -> Option<usize> {
        self.values.iter().position(Option::is_some)
    }
}

/// Trait for indicator groups.
///
/// A group produces one or more related columns (MACD produces `MACD`,
/// `Signal` and `MACD_Hist`). `compute` must return exactly the columns named
/// by `columns()`, in that order, each of the same length as `bars`.
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on price data from bar t+1 or later.
pub trait Indicator: Send + Sync {
    /// Group name used in logs and diagnostics (e.g. "MACD", "KDJ").
    fn name(&self) -> &str;

    /// Index of the first bar at which the slowest column can be defined.
    fn lookback(&self) -> usize;

    /// Output column names, in output order.
    fn columns(&self) -> Vec<String>;

    /// Compute every column of the group over the whole series.
    fn compute(&self, bars: &[Bar]) -> IndicatorOutput;
}

/// Result of evaluating one indicator group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorOutput {
    pub columns: Vec<Column>,
    /// Cells that hit a zero-denominator window and received the fallback.
    pub degenerate_cells: usize,
}

impl IndicatorOutput {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            degenerate_cells: 0,
        }
    }
}

/// Ordered container of indicator columns.
///
/// Column order is insertion order, which keeps exports deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorValues {
    columns: Vec<Column>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a named column. Names must be unique.
    pub fn insert(&mut self, column: Column) -> Result<(), EngineError> {
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(EngineError::DuplicateColumn(column.name));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Move every column of `other` into `self`.
    pub fn merge(&mut self, other: IndicatorValues) -> Result<(), EngineError> {
        for column in other.columns {
            self.insert(column)?;
        }
        Ok(())
    }

    /// Value at a specific bar index.
    ///
    /// Outer `None`: unknown column or index out of range.
    /// Inner `None`: the cell exists but holds no value.
    pub fn get(&self, name: &str, bar_index: usize) -> Option<Option<f64>> {
        self.get_series(name)
            .and_then(|v| v.get(bar_index).copied())
    }

    /// Full series for a named column.
    pub fn get_series(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// All cells of one row, in column order.
    pub fn row(&self, bar_index: usize) -> Vec<(&str, Option<f64>)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.values.get(bar_index).copied().flatten()))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of columns stored.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Keep only the last `n` cells of every column.
    pub fn tail(&self, n: usize) -> IndicatorValues {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let start = c.values.len().saturating_sub(n);
                Column::new(c.name.clone(), c.values[start..].to_vec())
            })
            .collect();
        IndicatorValues { columns }
    }
}
