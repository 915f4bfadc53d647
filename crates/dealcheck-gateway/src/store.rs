//! Deal storage
//!
//! Handlers only see the [`DealRepository`] trait; the in-memory store is
//! what the binary wires in.

use chrono::{DateTime, Utc};
use dealcheck_core::{FieldRecord, RiskAssessment};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Unique deal identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DealId(pub String);

impl DealId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for DealId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for DealId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for DealId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Processing state of a deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    /// Fields extracted, not yet scored
    Extracted,
    /// Risk assessment attached
    Validated,
}

/// An uploaded document and everything derived from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    pub deal_id: DealId,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub extracted_fields: FieldRecord,
    pub status: DealStatus,
    pub risk_assessment: Option<RiskAssessment>,
    pub validated_at: Option<DateTime<Utc>>,
}

impl Deal {
    /// A freshly extracted deal
    pub fn new(filename: impl Into<String>, extracted_fields: FieldRecord) -> Self {
        Self {
            deal_id: DealId::new(),
            filename: filename.into(),
            uploaded_at: Utc::now(),
            extracted_fields,
            status: DealStatus::Extracted,
            risk_assessment: None,
            validated_at: None,
        }
    }

    /// Attach an assessment and mark the deal validated
    pub fn record_assessment(&mut self, assessment: RiskAssessment) {
        self.risk_assessment = Some(assessment);
        self.status = DealStatus::Validated;
        self.validated_at = Some(Utc::now());
    }

    /// Stored score, 0 while unvalidated
    pub fn risk_score(&self) -> u32 {
        self.risk_assessment
            .as_ref()
            .map(|a| a.risk_score)
            .unwrap_or(0)
    }
}

/// Storage seam for deals
pub trait DealRepository: Send + Sync {
    fn get(&self, id: &DealId) -> Option<Deal>;

    /// Insert or replace
    fn put(&self, id: DealId, deal: Deal);

    /// Modify a stored deal in place and return the result
    ///
    /// Absent deals stay absent and yield `None`.
    fn update(&self, id: &DealId, f: &mut dyn FnMut(&mut Deal)) -> Option<Deal>;

    /// Remove and return the deal, `None` if it was absent
    fn delete(&self, id: &DealId) -> Option<Deal>;

    fn list(&self) -> Vec<Deal>;

    fn count(&self) -> usize {
        self.list().len()
    }
}

/// Process-local deal store
#[derive(Debug, Default)]
pub struct InMemoryDealStore {
    deals: Arc<RwLock<HashMap<DealId, Deal>>>,
}

impl InMemoryDealStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DealRepository for InMemoryDealStore {
    fn get(&self, id: &DealId) -> Option<Deal> {
        let deals = self.deals.read();
        deals.get(id).cloned()
    }

    fn put(&self, id: DealId, deal: Deal) {
        tracing::debug!("Deal stored: {}", id);
        self.deals.write().insert(id, deal);
    }

    fn update(&self, id: &DealId, f: &mut dyn FnMut(&mut Deal)) -> Option<Deal> {
        let mut deals = self.deals.write();
        let deal = deals.get_mut(id)?;
        f(deal);
        Some(deal.clone())
    }

    fn delete(&self, id: &DealId) -> Option<Deal> {
        let removed = self.deals.write().remove(id);
        if removed.is_some() {
            tracing::info!("Deal deleted: {}", id);
        }
        removed
    }

    fn list(&self) -> Vec<Deal> {
        let deals = self.deals.read();
        deals.values().cloned().collect()
    }

    fn count(&self) -> usize {
        self.deals.read().len()
    }
}
