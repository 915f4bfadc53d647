//! Core types for the deal checker
//!
//! - Extracted field records and their field names
//! - Findings produced by rule checks
//! - The aggregated risk assessment and its display views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Timestamp type alias
pub type Timestamp = DateTime<Utc>;

/// Names of the fields an extraction can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Counterparty,
    NotionalAmount,
    Currency,
    InterestRate,
    TradeDate,
    MaturityDate,
    SettlementDate,
    Collateral,
    TerminationClause,
}

impl FieldName {
    /// Every field, in record order
    pub const ALL: [FieldName; 9] = [
        FieldName::Counterparty,
        FieldName::NotionalAmount,
        FieldName::Currency,
        FieldName::InterestRate,
        FieldName::TradeDate,
        FieldName::MaturityDate,
        FieldName::SettlementDate,
        FieldName::Collateral,
        FieldName::TerminationClause,
    ];

    /// Wire key, e.g. `interest_rate`
    pub fn key(self) -> &'static str {
        match self {
            FieldName::Counterparty => "counterparty",
            FieldName::NotionalAmount => "notional_amount",
            FieldName::Currency => "currency",
            FieldName::InterestRate => "interest_rate",
            FieldName::TradeDate => "trade_date",
            FieldName::MaturityDate => "maturity_date",
            FieldName::SettlementDate => "settlement_date",
            FieldName::Collateral => "collateral",
            FieldName::TerminationClause => "termination_clause",
        }
    }

    /// Human label, e.g. `Interest Rate`
    pub fn label(self) -> String {
        self.key()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Lowercase prose form, e.g. `interest rate`
    pub fn prose(self) -> String {
        self.key().replace('_', " ")
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FieldName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .iter()
            .copied()
            .find(|name| name.key() == s)
            .ok_or_else(|| CoreError::UnknownOverrideField(s.to_string()))
    }
}

/// Fields extracted from a deal document
///
/// Every field is optional; absence means "not extracted". Empty strings are
/// read as absent as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub counterparty: Option<String>,
    pub notional_amount: Option<String>,
    pub currency: Option<String>,
    pub interest_rate: Option<String>,
    pub trade_date: Option<String>,
    pub maturity_date: Option<String>,
    pub settlement_date: Option<String>,
    pub collateral: Option<String>,
    pub termination_clause: Option<String>,
}

impl FieldRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, builder style
    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.set(field, Some(value.into()));
        self
    }

    fn slot(&self, field: FieldName) -> &Option<String> {
        match field {
            FieldName::Counterparty => &self.counterparty,
            FieldName::NotionalAmount => &self.notional_amount,
            FieldName::Currency => &self.currency,
            FieldName::InterestRate => &self.interest_rate,
            FieldName::TradeDate => &self.trade_date,
            FieldName::MaturityDate => &self.maturity_date,
            FieldName::SettlementDate => &self.settlement_date,
            FieldName::Collateral => &self.collateral,
            FieldName::TerminationClause => &self.termination_clause,
        }
    }

    fn slot_mut(&mut self, field: FieldName) -> &mut Option<String> {
        match field {
            FieldName::Counterparty => &mut self.counterparty,
            FieldName::NotionalAmount => &mut self.notional_amount,
            FieldName::Currency => &mut self.currency,
            FieldName::InterestRate => &mut self.interest_rate,
            FieldName::TradeDate => &mut self.trade_date,
            FieldName::MaturityDate => &mut self.maturity_date,
            FieldName::SettlementDate => &mut self.settlement_date,
            FieldName::Collateral => &mut self.collateral,
            FieldName::TerminationClause => &mut self.termination_clause,
        }
    }

    /// Value of a field if it was extracted
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.slot(field).as_deref().filter(|v| !v.is_empty())
    }

    /// Replace a field value
    pub fn set(&mut self, field: FieldName, value: Option<String>) {
        *self.slot_mut(field) = value;
    }

    /// Number of fields that were extracted
    pub fn present_count(&self) -> usize {
        FieldName::ALL
            .iter()
            .filter(|field| self.get(**field).is_some())
            .count()
    }

    /// Total number of fields a record can carry
    pub fn total_fields() -> usize {
        FieldName::ALL.len()
    }
}

/// Outcome of a single rule check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingStatus {
    Valid,
    Warning,
    Error,
}

impl FindingStatus {
    /// Whether the finding is surfaced in the audit trail
    pub fn is_flagged(self) -> bool {
        matches!(self, FindingStatus::Warning | FindingStatus::Error)
    }
}

impl fmt::Display for FindingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Severity attached to a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// One validation outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Human label of the field or relationship checked
    pub field: String,
    pub status: FindingStatus,
    pub explanation: String,
    pub severity: Severity,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Expected or standard value
    pub standard_value: String,
    /// Document excerpt shown alongside the finding
    pub document_snippet: String,
}

impl Finding {
    /// Start a finding; confidence defaults to 1.0
    pub fn new(field: impl Into<String>, status: FindingStatus, severity: Severity) -> Self {
        Self {
            field: field.into(),
            status,
            explanation: String::new(),
            severity,
            confidence: 1.0,
            standard_value: String::new(),
            document_snippet: String::new(),
        }
    }

    pub fn explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn standard(mut self, standard: impl Into<String>) -> Self {
        self.standard_value = standard.into();
        self
    }

    pub fn snippet(mut self, snippet: impl Into<String>) -> Self {
        self.document_snippet = snippet.into();
        self
    }
}

/// Structured explanation attached to a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiExplanation {
    pub reasoning: String,
    /// Cited rule provision
    pub regulation: String,
    pub recommendation: String,
}

/// Categorical risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskLevel {
    /// Upper bound (inclusive) of the low band
    pub const LOW_MAX: u32 = 30;
    /// Upper bound (inclusive) of the medium band
    pub const MEDIUM_MAX: u32 = 60;

    /// Classify a score with the standard bands
    pub fn from_score(score: u32) -> Self {
        Self::classify(score, Self::LOW_MAX, Self::MEDIUM_MAX)
    }

    /// Classify a score with explicit inclusive upper bounds
    pub fn classify(score: u32, low_max: u32, medium_max: u32) -> Self {
        if score <= low_max {
            RiskLevel::Low
        } else if score <= medium_max {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compliance status in the benchmark table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceStatus {
    Compliant,
    Warning,
    Violation,
}

/// One row of the benchmark comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    pub field: String,
    pub standard: String,
    pub extracted: String,
    pub status: ComplianceStatus,
    pub description: String,
}

/// Kind of audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditEventType {
    Upload,
    Extraction,
    Validation,
}

/// Resolution of an audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Completed,
    Flagged,
}

/// Synthetic audit-trail entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: String,
    pub timestamp: Timestamp,
    #[serde(rename = "type")]
    pub event_type: AuditEventType,
    pub title: String,
    pub description: String,
    /// Actor credited with the event
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    pub status: AuditStatus,
}

/// Aggregated result of validating one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Score in [0, 100]
    pub risk_score: u32,
    pub risk_level: RiskLevel,
    /// Findings in rule-evaluation order
    pub validations: Vec<Finding>,
    pub ai_explanations: BTreeMap<String, AiExplanation>,
    pub benchmark_comparison: Vec<BenchmarkEntry>,
    pub audit_trail: Vec<AuditEvent>,
}

impl RiskAssessment {
    /// Findings with the given status
    pub fn with_status(&self, status: FindingStatus) -> impl Iterator<Item = &Finding> {
        self.validations.iter().filter(move |f| f.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_labels() {
        assert_eq!(FieldName::InterestRate.label(), "Interest Rate");
        assert_eq!(FieldName::Counterparty.label(), "Counterparty");
        assert_eq!(FieldName::NotionalAmount.prose(), "notional amount");
    }

    #[test]
    fn test_field_name_parse() {
        assert_eq!("trade_date".parse::<FieldName>().unwrap(), FieldName::TradeDate);
        assert!(matches!(
            "tradeDate".parse::<FieldName>(),
            Err(CoreError::UnknownOverrideField(_))
        ));
    }

    #[test]
    fn test_empty_string_is_absent() {
        let record = FieldRecord::new()
            .with(FieldName::Currency, "")
            .with(FieldName::Counterparty, "ABC Bank Ltd.");

        assert_eq!(record.get(FieldName::Currency), None);
        assert_eq!(record.get(FieldName::Counterparty), Some("ABC Bank Ltd."));
        assert_eq!(record.present_count(), 1);
    }

    #[test]
    fn test_record_serializes_nulls() {
        let record = FieldRecord::new().with(FieldName::Currency, "USD");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["currency"], "USD");
        assert!(json["interest_rate"].is_null());
        assert_eq!(json.as_object().unwrap().len(), FieldRecord::total_fields());
    }

    #[test]
    fn test_risk_level_bands() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(31), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(60), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(61), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    }

    #[test]
    fn test_risk_level_wire_form() {
        let json = serde_json::to_string(&RiskLevel::Medium).unwrap();
        assert_eq!(json, "\"Medium Risk\"");
    }

    #[test]
    fn test_audit_event_type_renamed() {
        let event = AuditEvent {
            id: "1".to_string(),
            timestamp: Utc::now(),
            event_type: AuditEventType::Upload,
            title: "Document Uploaded".to_string(),
            description: String::new(),
            user: "System".to_string(),
            severity: None,
            status: AuditStatus::Completed,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "upload");
        assert!(json.get("severity").is_none());
    }
}
