//! Error types for the deal checker core
//!
//! Only structurally broken input is an error. Expected defects in a deal
//! (unknown currency, unparseable notional, flagged counterparty) are scored
//! as findings instead and never surface here.

use thiserror::Error;

use crate::types::FieldName;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Main error type for validation, simulation and extraction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A present field could not be read in the shape a rule requires
    #[error("Malformed {field}: {value:?} ({reason})")]
    MalformedInput {
        field: FieldName,
        value: String,
        reason: String,
    },

    /// A simulation override named a field the record does not have
    #[error("Unknown override field: {0}")]
    UnknownOverrideField(String),
}

impl CoreError {
    /// Build a [`CoreError::MalformedInput`] for a field value
    pub fn malformed(field: FieldName, value: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedInput {
            field,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display_names_field() {
        let err = CoreError::malformed(FieldName::TradeDate, "2024/01/15", "input contains invalid characters");
        let msg = err.to_string();

        assert!(msg.contains("trade_date"));
        assert!(msg.contains("2024/01/15"));
    }

    #[test]
    fn test_unknown_override_display() {
        let err = CoreError::UnknownOverrideField("strike_price".to_string());
        assert_eq!(err.to_string(), "Unknown override field: strike_price");
    }
}
