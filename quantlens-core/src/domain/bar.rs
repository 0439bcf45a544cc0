//! Bar: the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One OHLCV row of an already-retrieved price series.
///
/// `extra` holds any passthrough columns the upstream provider delivered
/// (open interest, settlement price, ...). They are carried into the output
/// verbatim and never read by an indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Bar {
    pub fn new(
        timestamp: NaiveDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            extra: BTreeMap::new(),
        }
    }

    /// Value of the selected numeric field.
    pub fn field(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::Volume => self.volume,
        }
    }

    /// Returns the first non-finite numeric field, if any.
    pub fn first_non_finite(&self) -> Option<(PriceField, f64)> {
        PriceField::ALL
            .iter()
            .map(|&f| (f, self.field(f)))
            .find(|(_, v)| !v.is_finite())
    }

    /// Returns true if every OHLCV field is a finite number.
    pub fn is_finite(&self) -> bool {
        self.first_non_finite().is_none()
    }

    /// Basic OHLCV sanity check: high >= low, high >= open, high >= close, etc.
    ///
    /// Not enforced by the engine; upstream data occasionally violates it and
    /// the indicators are still well defined.
    pub fn is_sane(&self) -> bool {
        if !self.is_finite() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.volume >= 0.0
    }
}

/// Selects which numeric column of a [`Bar`] a transform reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl PriceField {
    pub const ALL: [PriceField; 5] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
        PriceField::Volume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
            PriceField::Volume => "volume",
        }
    }

    /// Extract this field from every bar.
    pub fn extract(&self, bars: &[Bar]) -> Vec<f64> {
        bars.iter().map(|b| b.field(*self)).collect()
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
