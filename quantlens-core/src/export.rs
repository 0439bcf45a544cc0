//! Export an enriched series as JSON records or CSV.
//!
//! Undefined cells are JSON `null` / an empty CSV cell, never 0 or NaN.
//! Passthrough columns whose name collides with an indicator column are
//! shadowed by the indicator.

use crate::domain::Bar;
use crate::series::EnrichedSeries;
use chrono::{NaiveDateTime, NaiveTime};
use serde_json::{Map, Number, Value};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to flush CSV writer: {0}")]
    Flush(String),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

const BASE_COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

/// Date-only output for midnight timestamps, full datetime otherwise.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    if ts.time() == NaiveTime::MIN {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Union of passthrough column names, minus anything an indicator or base
/// column already uses.
fn extra_columns(series: &EnrichedSeries) -> Vec<String> {
    let reserved: BTreeSet<&str> = series
        .values()
        .names()
        .chain(BASE_COLUMNS.iter().copied())
        .collect();
    series
        .bars()
        .iter()
        .flat_map(|b| b.extra.keys())
        .filter(|k| !reserved.contains(k.as_str()))
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn number(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn cell(v: Option<f64>) -> Value {
    v.map(number).unwrap_or(Value::Null)
}

fn base_record(bar: &Bar) -> Map<String, Value> {
    let mut record = Map::new();
    record.insert("timestamp".into(), Value::String(format_timestamp(&bar.timestamp)));
    record.insert("open".into(), number(bar.open));
    record.insert("high".into(), number(bar.high));
    record.insert("low".into(), number(bar.low));
    record.insert("close".into(), number(bar.close));
    record.insert("volume".into(), number(bar.volume));
    record
}

/// One JSON object per row.
pub fn to_json_records(series: &EnrichedSeries) -> Value {
    let extras = extra_columns(series);
    let records = series
        .rows()
        .map(|row| {
            let mut record = base_record(row.bar);
            for name in &extras {
                if let Some(v) = row.bar.extra.get(name) {
                    record.insert(name.clone(), Value::String(v.clone()));
                }
            }
            for (name, v) in &row.indicators {
                record.insert((*name).to_string(), cell(*v));
            }
            Value::Object(record)
        })
        .collect();
    Value::Array(records)
}

pub fn to_json_string(series: &EnrichedSeries, pretty: bool) -> Result<String, ExportError> {
    let value = to_json_records(series);
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(text)
}

/// CSV with header: timestamp, OHLCV, passthrough columns, indicators.
pub fn to_csv(series: &EnrichedSeries) -> Result<String, ExportError> {
    let extras = extra_columns(series);
    let mut wtr = csv::Writer::from_writer(vec![]);

    let header: Vec<&str> = BASE_COLUMNS
        .iter()
        .copied()
        .chain(extras.iter().map(String::as_str))
        .chain(series.values().names())
        .collect();
    wtr.write_record(&header)?;

    for row in series.rows() {
        let bar = row.bar;
        let mut record = vec![
            format_timestamp(&bar.timestamp),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ];
        record.extend(
            extras
                .iter()
                .map(|name| bar.extra.get(name).cloned().unwrap_or_default()),
        );
        record.extend(
            row.indicators
                .iter()
                .map(|(_, v)| v.map(|x| x.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(data)?)
}
