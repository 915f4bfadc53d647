//! Rule configuration
//!
//! Static tables the engine consults: which fields are critical, which
//! currencies and counterparties are acceptable, and the numeric thresholds
//! behind each rule. Loaded once at construction and never mutated.

use serde::{Deserialize, Serialize};

use crate::types::{FieldName, RiskLevel};

/// Rule tables and thresholds for the validation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Fields whose absence is scored as an error
    pub critical_fields: Vec<FieldName>,

    /// Accepted ISO 4217 codes
    pub valid_currencies: Vec<String>,

    /// Watchlist entries matched as substrings of the counterparty
    pub sanctioned_entities: Vec<String>,

    /// Substring a counterparty must carry to count as a bank
    pub bank_marker: String,

    /// Notional above this amount is flagged
    pub notional_limit: f64,

    /// Standard settlement lag in days (T+n)
    pub standard_settlement_days: i64,

    /// Settlement lag above this many days is flagged
    pub extended_settlement_days: i64,

    /// Maximum absolute score perturbation
    pub jitter_bound: i32,

    /// Inclusive upper bound of the low-risk band
    pub low_risk_max: u32,

    /// Inclusive upper bound of the medium-risk band
    pub medium_risk_max: u32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            critical_fields: vec![
                FieldName::Counterparty,
                FieldName::NotionalAmount,
                FieldName::InterestRate,
            ],
            valid_currencies: ["USD", "EUR", "GBP", "JPY", "CHF", "CAD", "AUD"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            sanctioned_entities: ["Sanctioned Corp", "Blocked Entity Ltd", "Restricted Bank"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            bank_marker: "Bank".to_string(),
            notional_limit: 100_000_000.0,
            standard_settlement_days: 2,
            extended_settlement_days: 5,
            jitter_bound: 5,
            low_risk_max: RiskLevel::LOW_MAX,
            medium_risk_max: RiskLevel::MEDIUM_MAX,
        }
    }
}

impl RuleConfig {
    /// Create the standard rule set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid_currency(&self, code: &str) -> bool {
        self.valid_currencies.iter().any(|c| c == code)
    }

    /// First watchlist entry contained in the counterparty name
    pub fn sanctions_hit(&self, counterparty: &str) -> Option<&str> {
        self.sanctioned_entities
            .iter()
            .map(String::as_str)
            .find(|entity| counterparty.contains(entity))
    }

    /// Map a clamped score onto a risk level
    pub fn level_for(&self, score: u32) -> RiskLevel {
        RiskLevel::classify(score, self.low_risk_max, self.medium_risk_max)
    }
}
