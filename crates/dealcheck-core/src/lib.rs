//! Deal Checker Core - Risk validation for extracted deal documents
//!
//! The core turns a [`FieldRecord`] of extracted deal terms into a
//! [`RiskAssessment`]: ordered findings, a clamped score, a risk level, a
//! benchmark table and a synthetic audit trail.
//!
//! # Architecture
//!
//! 1. **Rules** (`validation::rules`): independent checks, each yielding findings and a score delta
//! 2. **Engine** (`validation`): runs the rules, jitters and clamps the score, builds display views
//! 3. **Simulation** (`simulation`): re-scores a record with field overrides applied
//! 4. **Summary** (`summary`): narrative and recommendation from score and findings
//! 5. **Extraction** (`extraction`): canned stand-in for document extraction
//!
//! Randomness is injected through [`random::RandomSource`] so every output
//! can be pinned.
//!
//! # Quick Start
//!
//! ```
//! use dealcheck_core::random::FixedRandom;
//! use dealcheck_core::types::{FieldName, FieldRecord, FindingStatus};
//! use dealcheck_core::{SummaryGenerator, ValidationEngine};
//! use std::sync::Arc;
//!
//! let rng = Arc::new(FixedRandom::zero());
//! let engine = ValidationEngine::with_random(rng.clone());
//!
//! let record = FieldRecord::new()
//!     .with(FieldName::Counterparty, "ABC Bank Ltd.")
//!     .with(FieldName::NotionalAmount, "not_a_number");
//!
//! let assessment = engine.validate(&record).unwrap();
//! assert!(assessment
//!     .validations
//!     .iter()
//!     .any(|f| f.field == "Notional Amount" && f.status == FindingStatus::Error));
//!
//! let summary = SummaryGenerator::new(rng).summarize(assessment.risk_score, &assessment.validations);
//! println!("{}", summary.narrative);
//! ```

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations, clippy::all)]

pub mod config;
pub mod error;
pub mod extraction;
pub mod random;
pub mod simulation;
pub mod summary;
pub mod types;
pub mod validation;

// Re-export commonly used types for convenience
pub use config::RuleConfig;
pub use error::{CoreError, Result};
pub use extraction::MockExtractor;
pub use random::{FixedRandom, RandomSource, SeededRandom, ThreadRandom};
pub use simulation::{SimulationResult, SimulationRunner};
pub use summary::{Summary, SummaryGenerator};
pub use types::{
    AiExplanation, AuditEvent, BenchmarkEntry, FieldName, FieldRecord, Finding, FindingStatus,
    RiskAssessment, RiskLevel, Severity, Timestamp,
};
pub use validation::ValidationEngine;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    #[test]
    fn test_extract_validate_summarize() {
        let rng: Arc<dyn RandomSource> = Arc::new(FixedRandom::new(0, 0.5));
        let extractor = MockExtractor::new(rng.clone());
        let engine = ValidationEngine::with_random(rng.clone());

        let record = extractor.extract("isda_confirmation.pdf");
        let assessment = engine.validate(&record).unwrap();
        assert!(assessment.risk_score <= 100);

        let summary = SummaryGenerator::new(rng).summarize(assessment.risk_score, &assessment.validations);
        assert_eq!(summary.risk_score, assessment.risk_score);

        let runner = SimulationRunner::new(engine);
        let mut overrides = BTreeMap::new();
        overrides.insert("interest_rate".to_string(), "5.0".to_string());
        let result = runner
            .simulate(&record, &overrides, assessment.risk_score)
            .unwrap();
        assert!(result.score_change <= 0);
    }
}
