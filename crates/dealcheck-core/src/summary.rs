//! Plain-English deal summary
//!
//! Renders a short narrative from a score and its findings. Everything is
//! deterministic except the cosmetic confidence figure.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::random::{round2, RandomSource};
use crate::types::{Finding, FindingStatus, Severity};

/// Scores at or above this read as high risk
pub const HIGH_RISK_FROM: u32 = 70;
/// Scores at or above this read as moderate risk
pub const MODERATE_RISK_FROM: u32 = 40;

const CONFIDENCE_RANGE: (f64, f64) = (0.88, 0.96);

/// Rendered summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub risk_score: u32,
    /// "high risk", "moderate risk" or "low risk"
    pub risk_description: String,
    pub narrative: String,
    pub recommendation: String,
    pub key_insights: Vec<String>,
    pub critical_issues_count: usize,
    pub warning_issues_count: usize,
    pub confidence: f64,
}

/// Summary renderer
#[derive(Debug, Clone)]
pub struct SummaryGenerator {
    rng: Arc<dyn RandomSource>,
}

impl SummaryGenerator {
    pub fn new(rng: Arc<dyn RandomSource>) -> Self {
        Self { rng }
    }

    pub fn summarize(&self, score: u32, findings: &[Finding]) -> Summary {
        let (risk_description, recommendation) = if score >= HIGH_RISK_FROM {
            (
                "high risk",
                "Recommend immediate human review and additional due diligence before proceeding.",
            )
        } else if score >= MODERATE_RISK_FROM {
            (
                "moderate risk",
                "Consider additional verification of flagged items before approval.",
            )
        } else {
            (
                "low risk",
                "Deal appears suitable for standard processing workflow.",
            )
        };

        let critical: Vec<&str> = fields_with_severity(findings, Severity::High);
        let attention: Vec<&str> = fields_with_severity(findings, Severity::Medium);

        let mut parts = vec![format!(
            "This financial agreement presents {risk_description} with an overall score of {score}/100."
        )];
        if !critical.is_empty() {
            parts.push(format!("Critical concerns identified: {}.", critical.join(", ")));
        }
        if !attention.is_empty() {
            parts.push(format!("Additional attention required for: {}.", attention.join(", ")));
        }
        parts.push(recommendation.to_string());

        let mut key_insights = Vec::new();
        if has_flag(findings, "Interest Rate", FindingStatus::Error) {
            key_insights.push(
                "Missing interest rate specification creates pricing uncertainty and regulatory compliance risk."
                    .to_string(),
            );
        }
        if has_flag(findings, "Counterparty", FindingStatus::Warning) {
            key_insights.push(
                "Counterparty verification incomplete - enhanced due diligence recommended."
                    .to_string(),
            );
        }

        let (lo, hi) = CONFIDENCE_RANGE;
        Summary {
            risk_score: score,
            risk_description: risk_description.to_string(),
            narrative: parts.join(" "),
            recommendation: recommendation.to_string(),
            key_insights,
            critical_issues_count: critical.len(),
            warning_issues_count: attention.len(),
            confidence: round2(self.rng.float_in_range(lo, hi)),
        }
    }
}

fn fields_with_severity(findings: &[Finding], severity: Severity) -> Vec<&str> {
    findings
        .iter()
        .filter(|f| f.severity == severity)
        .map(|f| f.field.as_str())
        .collect()
}

fn has_flag(findings: &[Finding], field_part: &str, status: FindingStatus) -> bool {
    findings
        .iter()
        .any(|f| f.status == status && f.field.contains(field_part))
}
