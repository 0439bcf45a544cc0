//! Column roles and cell parsing for tabular bar input.

use crate::domain::PriceField;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// What a named input column holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRole {
    Timestamp,
    Field(PriceField),
    /// Passthrough column, carried verbatim.
    Extra(String),
}

impl ColumnRole {
    /// Resolve a header name (case-insensitive, surrounding whitespace ignored).
    pub fn resolve(header: &str) -> Self {
        match header.trim().to_ascii_lowercase().as_str() {
            "date" | "timestamp" | "time" | "datetime" | "trade_date" => ColumnRole::Timestamp,
            "open" => ColumnRole::Field(PriceField::Open),
            "high" => ColumnRole::Field(PriceField::High),
            "low" => ColumnRole::Field(PriceField::Low),
            "close" => ColumnRole::Field(PriceField::Close),
            "volume" | "vol" => ColumnRole::Field(PriceField::Volume),
            _ => ColumnRole::Extra(header.trim().to_string()),
        }
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"];

/// Parse a timestamp cell. Date-only values land at midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Parse a numeric cell. An empty cell is a missing value (`Ok(None)`).
pub fn parse_number(value: &str) -> Result<Option<f64>, std::num::ParseFloatError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<f64>().map(Some)
}
