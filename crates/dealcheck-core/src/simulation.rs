//! What-if simulation
//!
//! Applies field overrides to a copy of a baseline record, re-validates it,
//! and reports how the score moved. Nothing is stored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::types::{FieldName, FieldRecord, Finding};
use crate::validation::ValidationEngine;

/// Outcome of one simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub new_risk_score: u32,
    /// `new_risk_score - baseline_score`
    pub score_change: i32,
    pub updated_validations: Vec<Finding>,
}

/// Parse raw override keys, rejecting any unknown field
pub fn parse_overrides(
    overrides: &BTreeMap<String, String>,
) -> Result<Vec<(FieldName, String)>> {
    overrides
        .iter()
        .map(|(key, value)| Ok((key.parse::<FieldName>()?, value.clone())))
        .collect()
}

/// Merge overrides onto a copy of the baseline
pub fn merge(baseline: &FieldRecord, overrides: &BTreeMap<String, String>) -> Result<FieldRecord> {
    let parsed = parse_overrides(overrides)?;
    let mut merged = baseline.clone();
    for (field, value) in parsed {
        merged.set(field, Some(value));
    }
    Ok(merged)
}

/// Re-runs the validation engine on modified records
#[derive(Debug, Clone)]
pub struct SimulationRunner {
    engine: ValidationEngine,
}

impl SimulationRunner {
    pub fn new(engine: ValidationEngine) -> Self {
        Self { engine }
    }

    /// Score the baseline with overrides applied and diff against `baseline_score`
    pub fn simulate(
        &self,
        baseline: &FieldRecord,
        overrides: &BTreeMap<String, String>,
        baseline_score: u32,
    ) -> Result<SimulationResult> {
        let merged = merge(baseline, overrides)?;
        let assessment = self.engine.validate(&merged)?;
        let score_change = assessment.risk_score as i32 - baseline_score as i32;

        tracing::debug!(
            overrides = overrides.len(),
            baseline_score,
            new_score = assessment.risk_score,
            score_change,
            "simulation scored"
        );

        Ok(SimulationResult {
            new_risk_score: assessment.risk_score,
            score_change,
            updated_validations: assessment.validations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::random::FixedRandom;
    use std::sync::Arc;

    fn runner() -> SimulationRunner {
        SimulationRunner::new(ValidationEngine::with_random(Arc::new(FixedRandom::zero())))
    }

    fn baseline() -> FieldRecord {
        FieldRecord::new()
            .with(FieldName::Counterparty, "ABC Bank Ltd.")
            .with(FieldName::NotionalAmount, "100000000")
            .with(FieldName::Currency, "USD")
    }

    fn overrides(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_adding_rate_lowers_score() {
        let base = baseline();
        let result = runner()
            .simulate(&base, &overrides(&[("interest_rate", "3.25")]), 30)
            .unwrap();

        assert_eq!(result.new_risk_score, 0);
        assert_eq!(result.score_change, -30);
        assert_eq!(base.interest_rate, None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = runner()
            .simulate(&baseline(), &overrides(&[("strike", "1.0"), ("currency", "EUR")]), 0)
            .unwrap_err();

        assert_eq!(err, CoreError::UnknownOverrideField("strike".to_string()));
    }

    #[test]
    fn test_simulation_is_repeatable() {
        let changes = overrides(&[("counterparty", "Global Finance Corp")]);
        let first = runner().simulate(&baseline(), &changes, 30).unwrap();
        let second = runner().simulate(&baseline(), &changes, 30).unwrap();

        assert_eq!(first.new_risk_score, second.new_risk_score);
        assert_eq!(first, second);
    }

    #[test]
    fn test_merge_replaces_only_named_fields() {
        let merged = merge(&baseline(), &overrides(&[("currency", "GBP")])).unwrap();

        assert_eq!(merged.get(FieldName::Currency), Some("GBP"));
        assert_eq!(merged.get(FieldName::Counterparty), Some("ABC Bank Ltd."));
    }
}
