//! Enriched output series and per-call diagnostics.

use crate::domain::Bar;
use crate::indicator::IndicatorValues;
use crate::indicators::DegeneratePolicy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-fatal conditions found while computing a series.
///
/// Callers decide how to degrade (e.g. show "insufficient data" for one
/// indicator while rendering the others).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The series is shorter than the group's warm-up; its slowest column
    /// has no values.
    InsufficientData {
        indicator: String,
        required: usize,
        available: usize,
    },
    /// Zero-denominator windows resolved through the degenerate policy.
    DegenerateWindow {
        indicator: String,
        count: usize,
        policy: DegeneratePolicy,
    },
}

impl Diagnostic {
    pub fn indicator(&self) -> &str {
        match self {
            Diagnostic::InsufficientData { indicator, .. }
            | Diagnostic::DegenerateWindow { indicator, .. } => indicator,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InsufficientData {
                indicator,
                required,
                available,
            } => write!(
                f,
                "{indicator}: insufficient data ({available} bars, {required} required)"
            ),
            Diagnostic::DegenerateWindow {
                indicator,
                count,
                policy,
            } => write!(
                f,
                "{indicator}: {count} zero-range window(s) resolved as {policy}"
            ),
        }
    }
}

/// The input bars plus every derived column, positionally aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSeries {
    bars: Vec<Bar>,
    values: IndicatorValues,
    diagnostics: Vec<Diagnostic>,
}

impl EnrichedSeries {
    pub(crate) fn new(bars: Vec<Bar>, values: IndicatorValues, diagnostics: Vec<Diagnostic>) -> Self {
        debug_assert!(values.columns().iter().all(|c| c.values.len() == bars.len()));
        Self {
            bars,
            values,
            diagnostics,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn values(&self) -> &IndicatorValues {
        &self.values
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Full series for one indicator column.
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.values.get_series(name)
    }

    /// True if the named group reported insufficient data.
    pub fn is_insufficient(&self, indicator: &str) -> bool {
        self.diagnostics.iter().any(|d| {
            matches!(d, Diagnostic::InsufficientData { .. }) && d.indicator() == indicator
        })
    }

    pub fn row(&self, index: usize) -> Option<EnrichedBar<'_>> {
        let bar = self.bars.get(index)?;
        Some(EnrichedBar {
            bar,
            indicators: self.values.row(index),
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = EnrichedBar<'_>> {
        (0..self.len()).filter_map(move |i| self.row(i))
    }

    /// The last `n` rows (all rows if `n >= len`). Diagnostics are kept.
    pub fn tail(&self, n: usize) -> EnrichedSeries {
        let start = self.bars.len().saturating_sub(n);
        EnrichedSeries {
            bars: self.bars[start..].to_vec(),
            values: self.values.tail(n),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

/// One output row: the original bar and its indicator cells.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedBar<'a> {
    pub bar: &'a Bar,
    pub indicators: Vec<(&'a str, Option<f64>)>,
}

impl EnrichedBar<'_> {
    /// Outer `None`: no such column. Inner `None`: no value in this cell.
    pub fn get(&self, name: &str) -> Option<Option<f64>> {
        self.indicators
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::Column;
    use crate::indicators::make_bars;

    fn sample() -> EnrichedSeries {
        let bars = make_bars(&[1.0, 2.0, 3.0]);
        let mut values = IndicatorValues::new();
        values
            .insert(Column::new("MA2", vec![None, Some(1.5), Some(2.5)]))
            .unwrap();
        EnrichedSeries::new(
            bars,
            values,
            vec![Diagnostic::InsufficientData {
                indicator: "MA".into(),
                required: 60,
                available: 3,
            }],
        )
    }

    #[test]
    fn row_exposes_bar_and_cells() {
        let s = sample();
        let row = s.row(1).unwrap();
        assert_eq!(row.bar.close, 2.0);
        assert_eq!(row.get("MA2"), Some(Some(1.5)));
        assert_eq!(row.get("nope"), None);
        assert_eq!(s.row(0).unwrap().get("MA2"), Some(None));
        assert!(s.row(3).is_none());
        assert_eq!(s.rows().count(), 3);
    }

    #[test]
    fn tail_slices_bars_and_columns() {
        let t = sample().tail(2);
        assert_eq!(t.len(), 2);
        assert_eq!(t.bars()[0].close, 2.0);
        assert_eq!(t.column("MA2").unwrap(), &[Some(1.5), Some(2.5)]);
        assert!(t.is_insufficient("MA"));
        assert!(!t.is_insufficient("RSI"));
    }

    #[test]
    fn diagnostic_display() {
        let d = Diagnostic::DegenerateWindow {
            indicator: "KDJ".into(),
            count: 4,
            policy: DegeneratePolicy::Neutral,
        };
        assert_eq!(d.to_string(), "KDJ: 4 zero-range window(s) resolved as neutral");
    }
}
