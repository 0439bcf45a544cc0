//! Run fingerprinting: deterministic identification of inputs and config.
//!
//! - `DatasetHash`: BLAKE3 over every bar (timestamp, OHLCV bits, passthrough).
//! - `ConfigHash`: BLAKE3 over the canonical JSON of the indicator config.
//!
//! The engine is a pure function of these two, so equal fingerprints imply
//! bit-identical output.

use crate::config::IndicatorConfig;
use crate::domain::{Bar, ConfigHash, DatasetHash};
use crate::series::{Diagnostic, EnrichedSeries};
use serde::{Deserialize, Serialize};

/// Content hash of a bar series.
pub fn dataset_hash(bars: &[Bar]) -> DatasetHash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(bars.len() as u64).to_le_bytes());
    for bar in bars {
        hasher.update(&bar.timestamp.and_utc().timestamp_micros().to_le_bytes());
        for v in [bar.open, bar.high, bar.low, bar.close, bar.volume] {
            hasher.update(&v.to_bits().to_le_bytes());
        }
        hasher.update(&(bar.extra.len() as u64).to_le_bytes());
        for (k, v) in &bar.extra {
            hasher.update(&(k.len() as u64).to_le_bytes());
            hasher.update(k.as_bytes());
            hasher.update(&(v.len() as u64).to_le_bytes());
            hasher.update(v.as_bytes());
        }
    }
    DatasetHash(hasher.finalize().to_hex().to_string())
}

/// Summary of one engine call, suitable for logging or a sidecar file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFingerprint {
    pub dataset_hash: DatasetHash,
    pub config_hash: ConfigHash,
    pub bars: usize,
    pub columns: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunFingerprint {
    pub fn new(input: &[Bar], config: &IndicatorConfig, series: &EnrichedSeries) -> Self {
        Self {
            dataset_hash: dataset_hash(input),
            config_hash: config.config_hash(),
            bars: series.len(),
            columns: series.values().names().map(str::to_string).collect(),
            diagnostics: series.diagnostics().to_vec(),
        }
    }
}
