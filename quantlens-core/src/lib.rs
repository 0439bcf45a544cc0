//! quantlens core: technical-indicator engine over OHLCV bar series.
//!
//! This crate contains:
//! - Domain types (bars, price fields, content hashes)
//! - Ingest and validation for CSV / JSON-records input
//! - Rolling-window primitives (ring buffer mean/std, monotonic min/max)
//! - Six indicator groups: MA, MACD, RSI, Bollinger Bands, KDJ, volume MA
//! - A pipeline that evaluates groups independently (optionally in parallel)
//!   and merges them into one enriched series
//! - JSON / CSV export, TOML configuration, run fingerprints

pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod export;
pub mod fingerprint;
pub mod indicator;
pub mod indicators;
pub mod pipeline;
pub mod series;
pub mod synthetic;

pub use config::{ConfigError, IndicatorConfig};
pub use domain::{Bar, PriceField};
pub use error::EngineError;
pub use indicator::{Column, Indicator, IndicatorValues};
pub use indicators::DegeneratePolicy;
pub use pipeline::{calculate_all_indicators, IndicatorPipeline};
pub use series::{Diagnostic, EnrichedBar, EnrichedSeries};
