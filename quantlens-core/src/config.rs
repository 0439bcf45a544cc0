//! Serializable indicator configuration.
//!
//! Every field defaults to the standard parameters, so an empty TOML document
//! is the default configuration:
//!
//! ```toml
//! degenerate_policy = "neutral"
//!
//! [ma]
//! periods = [5, 10, 20, 60]
//!
//! [macd]
//! fast = 12
//! slow = 26
//! signal = 9
//! ```

use crate::domain::ConfigHash;
use crate::error::EngineError;
use crate::indicators::DegeneratePolicy;
use crate::pipeline::IndicatorPipeline;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] EngineError),
}

/// Parameters for all six indicator groups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IndicatorConfig {
    /// Fallback for RSI / KDJ zero-denominator windows.
    pub degenerate_policy: DegeneratePolicy,
    pub ma: PeriodsConfig,
    pub macd: MacdConfig,
    pub rsi: RsiConfig,
    pub bollinger: BollingerConfig,
    pub kdj: KdjConfig,
    pub volume_ma: PeriodsConfig,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            degenerate_policy: DegeneratePolicy::Neutral,
            ma: PeriodsConfig {
                periods: vec![5, 10, 20, 60],
            },
            macd: MacdConfig::default(),
            rsi: RsiConfig::default(),
            bollinger: BollingerConfig::default(),
            kdj: KdjConfig::default(),
            volume_ma: PeriodsConfig {
                periods: vec![5, 10, 20],
            },
        }
    }
}

/// Window sizes for a moving-average group. Required inside its table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PeriodsConfig {
    pub periods: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MacdConfig {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RsiConfig {
    pub period: usize,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self { period: 14 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BollingerConfig {
    pub period: usize,
    pub multiplier: f64,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            period: 20,
            multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct KdjConfig {
    /// RSV lookback.
    pub n: usize,
    /// K smoothing (alpha = 1/m1).
    pub m1: usize,
    /// D smoothing (alpha = 1/m2).
    pub m2: usize,
}

impl Default for KdjConfig {
    fn default() -> Self {
        Self { n: 9, m1: 3, m2: 3 }
    }
}

impl IndicatorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: IndicatorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every group's parameters by building the pipeline.
    pub fn validate(&self) -> Result<(), EngineError> {
        IndicatorPipeline::from_config(self).map(|_| ())
    }

    /// BLAKE3 hash of the canonical JSON encoding.
    pub fn config_hash(&self) -> ConfigHash {
        // struct fields serialize in declaration order, so the JSON is canonical
        let json = serde_json::to_vec(self).unwrap_or_default();
        ConfigHash::from_bytes(&json)
    }
}
