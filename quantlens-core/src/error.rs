//! Engine error taxonomy.
//!
//! Only malformed input and invalid parameters are hard failures. Short series
//! and zero-range windows are reported as [`crate::series::Diagnostic`]s on an
//! otherwise successful result.

use crate::domain::PriceField;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("row {row}: required field '{field}' is missing")]
    MissingField { row: usize, field: PriceField },

    #[error("row {row}: field '{field}' is not a finite number ({value})")]
    NonFiniteField {
        row: usize,
        field: PriceField,
        value: f64,
    },

    #[error("invalid parameter for {indicator}: {reason}")]
    InvalidParameter { indicator: String, reason: String },

    #[error("duplicate indicator column '{0}'")]
    DuplicateColumn(String),
}

impl EngineError {
    pub(crate) fn invalid(indicator: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            indicator: indicator.to_string(),
            reason: reason.into(),
        }
    }

    /// True for the malformed-input class of errors.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::MissingField { .. } | Self::NonFiniteField { .. })
    }
}
