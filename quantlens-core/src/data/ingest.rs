//! Ingest: turn upstream rows into validated bars.
//!
//! Rows arrive either as CSV or as JSON records (the orientation market-data
//! providers return). Both paths build `RawBar`s, whose numeric fields may be
//! missing, and then fail fast on the first malformed row before any
//! indicator runs.

use crate::data::schema::{parse_number, parse_timestamp, ColumnRole};
use crate::domain::{Bar, PriceField};
use crate::error::EngineError;
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of records")]
    NotAnArray,

    #[error("row {row}: expected a JSON object")]
    NotAnObject { row: usize },

    #[error("input has no timestamp column (date/timestamp/time/datetime)")]
    MissingTimestampColumn,

    #[error("row {row}: timestamp is missing")]
    MissingTimestamp { row: usize },

    #[error("row {row}: unrecognised timestamp '{value}'")]
    InvalidTimestamp { row: usize, value: String },

    #[error("row {row}: column '{column}' is not a number ('{value}')")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Ingest-side bar: numeric fields may be absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawBar {
    pub timestamp: Option<NaiveDateTime>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    pub extra: BTreeMap<String, String>,
}

impl RawBar {
    fn slot(&mut self, field: PriceField) -> &mut Option<f64> {
        match field {
            PriceField::Open => &mut self.open,
            PriceField::High => &mut self.high,
            PriceField::Low => &mut self.low,
            PriceField::Close => &mut self.close,
            PriceField::Volume => &mut self.volume,
        }
    }

    fn get(&self, field: PriceField) -> Option<f64> {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::Volume => self.volume,
        }
    }
}

/// Convert raw rows to bars, failing on the first row with a missing
/// timestamp or OHLCV field.
pub fn validate_raw(raw: Vec<RawBar>) -> Result<Vec<Bar>, LoadError> {
    let mut bars = Vec::with_capacity(raw.len());
    for (row, r) in raw.into_iter().enumerate() {
        let timestamp = r.timestamp.ok_or(LoadError::MissingTimestamp { row })?;
        let mut fields = [0.0; 5];
        for (slot, field) in fields.iter_mut().zip(PriceField::ALL) {
            *slot = r.get(field).ok_or(EngineError::MissingField { row, field })?;
        }
        let [open, high, low, close, volume] = fields;
        bars.push(Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            extra: r.extra,
        });
    }
    validate_bars(&bars)?;
    Ok(bars)
}

/// Reject any bar with a non-finite OHLCV value.
///
/// Ordering is not enforced: duplicates and out-of-order timestamps pass
/// through untouched.
pub fn validate_bars(bars: &[Bar]) -> Result<(), EngineError> {
    for (row, bar) in bars.iter().enumerate() {
        if let Some((field, value)) = bar.first_non_finite() {
            return Err(EngineError::NonFiniteField { row, field, value });
        }
    }
    let unordered = bars
        .windows(2)
        .filter(|w| w[1].timestamp < w[0].timestamp)
        .count();
    if unordered > 0 {
        debug!(unordered, "input timestamps are not ascending; passing through");
    }
    Ok(())
}

/// Read bars from CSV with a header row.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Bar>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let roles: Vec<ColumnRole> = rdr.headers()?.iter().map(ColumnRole::resolve).collect();
    if !roles.contains(&ColumnRole::Timestamp) {
        return Err(LoadError::MissingTimestampColumn);
    }

    let mut raw = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let mut bar = RawBar::default();
        for (role, cell) in roles.iter().zip(record.iter()) {
            match role {
                ColumnRole::Timestamp => {
                    if cell.is_empty() {
                        continue;
                    }
                    bar.timestamp = Some(parse_timestamp(cell).ok_or_else(|| {
                        LoadError::InvalidTimestamp {
                            row,
                            value: cell.to_string(),
                        }
                    })?);
                }
                ColumnRole::Field(field) => {
                    *bar.slot(*field) =
                        parse_number(cell).map_err(|_| LoadError::InvalidNumber {
                            row,
                            column: field.to_string(),
                            value: cell.to_string(),
                        })?;
                }
                ColumnRole::Extra(name) => {
                    bar.extra.insert(name.clone(), cell.to_string());
                }
            }
        }
        raw.push(bar);
    }
    debug!(rows = raw.len(), "read CSV rows");
    validate_raw(raw)
}

/// Read bars from a JSON array of records.
///
/// Numeric fields may be JSON numbers or numeric strings; timestamps may be
/// strings or `YYYYMMDD` integers.
pub fn read_json_records(content: &str) -> Result<Vec<Bar>, LoadError> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(records) = value else {
        return Err(LoadError::NotAnArray);
    };

    let mut raw = Vec::with_capacity(records.len());
    for (row, record) in records.into_iter().enumerate() {
        let Value::Object(map) = record else {
            return Err(LoadError::NotAnObject { row });
        };
        let mut bar = RawBar::default();
        for (key, cell) in map {
            match ColumnRole::resolve(&key) {
                ColumnRole::Timestamp => {
                    let text = match &cell {
                        Value::Null => continue,
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    bar.timestamp = Some(
                        parse_timestamp(&text)
                            .ok_or(LoadError::InvalidTimestamp { row, value: text })?,
                    );
                }
                ColumnRole::Field(field) => {
                    *bar.slot(field) = json_number(&cell).map_err(|value| {
                        LoadError::InvalidNumber {
                            row,
                            column: field.to_string(),
                            value,
                        }
                    })?;
                }
                ColumnRole::Extra(name) => {
                    let text = match cell {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    bar.extra.insert(name, text);
                }
            }
        }
        raw.push(bar);
    }
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    if raw.iter().all(|r| r.timestamp.is_none()) {
        return Err(LoadError::MissingTimestampColumn);
    }
    debug!(rows = raw.len(), "read JSON records");
    validate_raw(raw)
}

fn json_number(cell: &Value) -> Result<Option<f64>, String> {
    match cell {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or_else(|| n.to_string()),
        Value::String(s) => parse_number(s).map_err(|_| s.clone()),
        other => Err(other.to_string()),
    }
}

/// Load bars from a `.csv` or `.json` file, chosen by extension.
pub fn load_path(path: &Path) -> Result<Vec<Bar>, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        let content = std::fs::read_to_string(path).map_err(io_err)?;
        read_json_records(&content)
    } else {
        let file = std::fs::File::open(path).map_err(io_err)?;
        read_csv(file)
    }
}
