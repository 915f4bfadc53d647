//! Validation Engine - Rule pipeline and risk scoring
//!
//! The engine runs every rule check over a [`FieldRecord`] in a fixed order,
//! sums their deltas, perturbs the sum by a bounded jitter drawn from the
//! injected [`RandomSource`], clamps it to `[0, 100]` and maps it onto a
//! [`RiskLevel`](crate::types::RiskLevel). It also builds the benchmark table
//! and the audit trail for display.
//!
//! # Example
//!
//! ```
//! use dealcheck_core::random::FixedRandom;
//! use dealcheck_core::types::{FieldName, FieldRecord, RiskLevel};
//! use dealcheck_core::ValidationEngine;
//! use std::sync::Arc;
//!
//! let engine = ValidationEngine::with_random(Arc::new(FixedRandom::zero()));
//! let record = FieldRecord::new()
//!     .with(FieldName::Counterparty, "International Bank")
//!     .with(FieldName::NotionalAmount, "75000000")
//!     .with(FieldName::InterestRate, "4.75");
//!
//! let assessment = engine.validate(&record).unwrap();
//! assert_eq!(assessment.risk_score, 0);
//! assert_eq!(assessment.risk_level, RiskLevel::Low);
//! ```

pub mod audit;
pub mod benchmark;
pub mod rules;

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::RuleConfig;
use crate::error::Result;
use crate::random::{RandomSource, ThreadRandom};
use crate::types::{FieldRecord, RiskAssessment, Timestamp};
use rules::RuleOutcome;

/// Rule pipeline over extracted deal fields
///
/// Holds only immutable configuration and the random source, so one engine
/// can serve concurrent callers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    config: RuleConfig,
    rng: Arc<dyn RandomSource>,
}

impl ValidationEngine {
    /// Create an engine with the standard rules and thread-local randomness
    pub fn new() -> Self {
        Self::with_config(RuleConfig::default(), Arc::new(ThreadRandom))
    }

    /// Create an engine with the standard rules and a given random source
    pub fn with_random(rng: Arc<dyn RandomSource>) -> Self {
        Self::with_config(RuleConfig::default(), rng)
    }

    /// Create an engine with custom rules
    pub fn with_config(config: RuleConfig, rng: Arc<dyn RandomSource>) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Random source shared with collaborators that need cosmetic figures
    pub fn random(&self) -> Arc<dyn RandomSource> {
        self.rng.clone()
    }

    /// Validate a record, anchoring the audit trail at the current time
    pub fn validate(&self, record: &FieldRecord) -> Result<RiskAssessment> {
        self.validate_at(record, Utc::now())
    }

    /// Validate a record with an explicit audit-trail anchor
    ///
    /// Fails only when a present date cannot be parsed; no partial
    /// assessment is returned in that case.
    pub fn validate_at(&self, record: &FieldRecord, generated_at: Timestamp) -> Result<RiskAssessment> {
        let outcomes = [
            rules::check_critical_fields(record, &self.config),
            rules::check_date_consistency(record)?,
            rules::check_currency(record, &self.config),
            rules::check_counterparty(record, &self.config),
            rules::check_notional(record, &self.config),
            rules::check_settlement_period(record, &self.config)?,
        ];

        let mut validations = Vec::new();
        let mut ai_explanations = BTreeMap::new();
        let mut raw_score = 0;

        for RuleOutcome {
            findings,
            delta,
            explanations,
        } in outcomes
        {
            raw_score += delta;
            validations.extend(findings);
            for (field, explanation) in explanations {
                ai_explanations.insert(field.key().to_string(), explanation);
            }
        }

        let bound = self.config.jitter_bound.abs();
        let jitter = self.rng.int_in_range(-bound, bound);
        let risk_score = clamp_score(raw_score + jitter);
        let risk_level = self.config.level_for(risk_score);

        let benchmark_comparison = benchmark::compare(record, &self.config)?;
        let audit_trail = audit::build_trail(record, &validations, generated_at);

        tracing::info!(
            raw_score,
            jitter,
            risk_score,
            level = %risk_level,
            findings = validations.len(),
            "risk assessment completed"
        );

        Ok(RiskAssessment {
            risk_score,
            risk_level,
            validations,
            ai_explanations,
            benchmark_comparison,
            audit_trail,
        })
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp a raw score into `[0, 100]`
pub fn clamp_score(raw: i32) -> u32 {
    raw.clamp(0, 100) as u32
}
