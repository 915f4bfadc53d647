//! Main Gateway implementation
//!
//! JSON-over-HTTP surface for uploading, validating, simulating and
//! summarizing deals.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Multipart, Path, Query, State,
    },
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use dealcheck_core::summary::{HIGH_RISK_FROM, MODERATE_RISK_FROM};
use dealcheck_core::{
    FieldRecord, MockExtractor, RandomSource, RiskAssessment, SeededRandom, SimulationResult,
    SimulationRunner, Summary, SummaryGenerator, ThreadRandom, ValidationEngine,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::store::{Deal, DealId, DealRepository, DealStatus, InMemoryDealStore};
use crate::{GatewayError, Result};

/// Reported processing time bounds for `/validate`, in milliseconds
const PROCESSING_TIME_MS: (i32, i32) = (800, 1500);

/// Gateway state shared across handlers
pub struct GatewayState {
    pub config: GatewayConfig,
    pub engine: Arc<ValidationEngine>,
    pub runner: SimulationRunner,
    pub summaries: SummaryGenerator,
    pub extractor: MockExtractor,
    pub deals: Arc<dyn DealRepository>,
    shutdown_tx: watch::Sender<bool>,
}

impl GatewayState {
    /// State with an in-memory store; seeded randomness when the config pins a seed
    pub fn new(config: GatewayConfig) -> Self {
        let rng: Arc<dyn RandomSource> = match config.seed {
            Some(seed) => Arc::new(SeededRandom::new(seed)),
            None => Arc::new(ThreadRandom),
        };
        Self::with_parts(config, rng, Arc::new(InMemoryDealStore::new()))
    }

    /// State from explicit collaborators
    pub fn with_parts(
        config: GatewayConfig,
        rng: Arc<dyn RandomSource>,
        deals: Arc<dyn DealRepository>,
    ) -> Self {
        let engine = ValidationEngine::with_config(config.rules.clone(), rng.clone());
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            runner: SimulationRunner::new(engine.clone()),
            engine: Arc::new(engine),
            summaries: SummaryGenerator::new(rng.clone()),
            extractor: MockExtractor::new(rng),
            deals,
            config,
            shutdown_tx,
        }
    }

    fn find_deal(&self, id: &DealId) -> Result<Deal> {
        self.deals
            .get(id)
            .ok_or_else(|| GatewayError::DealNotFound(id.to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub deal_id: DealId,
    pub filename: String,
    pub extraction_confidence: f64,
    pub extracted_fields: FieldRecord,
    pub fields_extracted: usize,
    pub total_fields: usize,
}

#[derive(Debug, Deserialize)]
pub struct ValidateParams {
    pub deal_id: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub deal_id: DealId,
    #[serde(flatten)]
    pub assessment: RiskAssessment,
    pub processing_time_ms: i32,
}

#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    pub deal_id: String,
    #[serde(default)]
    pub modified_fields: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub deal_id: DealId,
    pub original_risk_score: u32,
    #[serde(flatten)]
    pub result: SimulationResult,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub deal_id: DealId,
    /// Stored risk level, "Unknown" before validation
    pub risk_level: String,
    #[serde(flatten)]
    pub summary: Summary,
    pub generated_at: DateTime<Utc>,
}

/// One row of the dashboard listing
#[derive(Debug, Serialize)]
pub struct DealListing {
    pub deal_id: DealId,
    pub filename: String,
    pub counterparty: Option<String>,
    pub notional_amount: Option<String>,
    pub currency: Option<String>,
    pub risk_score: u32,
    pub risk_level: String,
    pub status: DealStatus,
    pub uploaded_at: DateTime<Utc>,
    pub validated_at: Option<DateTime<Utc>>,
}

impl From<&Deal> for DealListing {
    fn from(deal: &Deal) -> Self {
        let fields = &deal.extracted_fields;
        Self {
            deal_id: deal.deal_id.clone(),
            filename: deal.filename.clone(),
            counterparty: fields.counterparty.clone(),
            notional_amount: fields.notional_amount.clone(),
            currency: fields.currency.clone(),
            risk_score: deal.risk_score(),
            risk_level: risk_level_label(deal),
            status: deal.status,
            uploaded_at: deal.uploaded_at,
            validated_at: deal.validated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DealList {
    pub deals: Vec<DealListing>,
    pub total_count: usize,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub low_risk_count: usize,
}

impl DealList {
    /// Newest upload first, with risk bucket counts
    pub fn from_deals(deals: Vec<Deal>) -> Self {
        let mut deals: Vec<DealListing> = deals.iter().map(DealListing::from).collect();
        deals.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));

        let bucket = |pred: fn(u32) -> bool| deals.iter().filter(|d| pred(d.risk_score)).count();
        let high_risk_count = bucket(|s| s >= HIGH_RISK_FROM);
        let medium_risk_count = bucket(|s| (MODERATE_RISK_FROM..HIGH_RISK_FROM).contains(&s));
        let low_risk_count = bucket(|s| s < MODERATE_RISK_FROM);

        Self {
            total_count: deals.len(),
            deals,
            high_risk_count,
            medium_risk_count,
            low_risk_count,
        }
    }
}

fn risk_level_label(deal: &Deal) -> String {
    deal.risk_assessment
        .as_ref()
        .map(|a| a.risk_level.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Main Gateway
pub struct Gateway {
    state: Arc<GatewayState>,
}

impl Gateway {
    /// Create a new gateway with configuration
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_state(GatewayState::new(config))
    }

    /// Create a gateway around prepared state
    pub fn with_state(state: GatewayState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Create a gateway with default configuration
    pub fn default_config() -> Self {
        Self::new(GatewayConfig::default())
    }

    /// Get gateway state
    pub fn state(&self) -> Arc<GatewayState> {
        self.state.clone()
    }

    /// Build the Axum router
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/", get(Self::handle_index))
            .route("/upload", post(Self::handle_upload))
            .route("/validate", post(Self::handle_validate))
            .route("/simulate", post(Self::handle_simulate))
            .route("/summary/:deal_id", get(Self::handle_summary))
            .route("/deals", get(Self::handle_list_deals))
            .route(
                "/deal/:deal_id",
                get(Self::handle_get_deal).delete(Self::handle_delete_deal),
            )
            .route("/health", get(Self::handle_health))
            .layer(DefaultBodyLimit::max(self.state.config.max_upload_bytes))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the gateway server and run until [`Gateway::shutdown`] or Ctrl+C
    pub async fn start(&self) -> Result<()> {
        let addr = self.state.config.socket_addr()?;
        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Deal checker gateway listening on {}", listener.local_addr()?);

        let mut shutdown_rx = self.state.shutdown_tx.subscribe();
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_rx.wait_for(|stop| *stop) => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
                tracing::info!("Gateway shutdown initiated");
            })
            .await
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        Ok(())
    }

    /// Shutdown the gateway
    pub fn shutdown(&self) {
        self.state.shutdown_tx.send_replace(true);
    }

    // HTTP handlers

    async fn handle_index() -> impl IntoResponse {
        Json(serde_json::json!({
            "message": "Deal Checker API",
            "version": crate::VERSION,
            "status": "active"
        }))
    }

    async fn handle_health(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
        Json(serde_json::json!({
            "status": "healthy",
            "timestamp": Utc::now(),
            "deals_in_storage": state.deals.count(),
            "api_version": crate::VERSION
        }))
    }

    async fn handle_upload(
        State(state): State<Arc<GatewayState>>,
        multipart: std::result::Result<Multipart, MultipartRejection>,
    ) -> Result<Json<UploadResponse>> {
        let mut multipart = multipart?;
        while let Some(field) = multipart.next_field().await? {
            if field.name() != Some("file") {
                continue;
            }

            let content_type = field.content_type().unwrap_or_default().to_string();
            if !state.config.accepts_content_type(&content_type) {
                return Err(GatewayError::UnsupportedFileType(content_type));
            }
            let filename = field.file_name().unwrap_or("upload").to_string();
            let size = field.bytes().await?.len();

            let extracted_fields = state.extractor.extract(&filename);
            let deal = Deal::new(filename.clone(), extracted_fields.clone());
            let deal_id = deal.deal_id.clone();
            state.deals.put(deal_id.clone(), deal);

            tracing::info!(
                deal_id = %deal_id,
                filename = %filename,
                bytes = size,
                "Document uploaded and extracted"
            );

            return Ok(Json(UploadResponse {
                deal_id,
                filename,
                extraction_confidence: state.extractor.extraction_confidence(),
                fields_extracted: extracted_fields.present_count(),
                total_fields: FieldRecord::total_fields(),
                extracted_fields,
            }));
        }

        Err(GatewayError::BadRequest(
            "multipart body has no `file` field".to_string(),
        ))
    }

    async fn handle_validate(
        State(state): State<Arc<GatewayState>>,
        params: std::result::Result<Query<ValidateParams>, QueryRejection>,
    ) -> Result<Json<ValidateResponse>> {
        let Query(params) = params?;
        let deal_id = DealId::from(params.deal_id);
        let deal = state.find_deal(&deal_id)?;

        let assessment = state.engine.validate(&deal.extracted_fields)?;
        // Deleted while scoring: report it gone rather than resurrect it
        state
            .deals
            .update(&deal_id, &mut |stored| stored.record_assessment(assessment.clone()))
            .ok_or_else(|| GatewayError::DealNotFound(deal_id.to_string()))?;

        let (lo, hi) = PROCESSING_TIME_MS;
        Ok(Json(ValidateResponse {
            deal_id,
            assessment,
            processing_time_ms: state.engine.random().int_in_range(lo, hi),
        }))
    }

    async fn handle_simulate(
        State(state): State<Arc<GatewayState>>,
        request: std::result::Result<Json<SimulationRequest>, JsonRejection>,
    ) -> Result<Json<SimulationResponse>> {
        let Json(request) = request?;
        let deal_id = DealId::from(request.deal_id);
        let deal = state.find_deal(&deal_id)?;
        let original_risk_score = deal.risk_score();

        let result = state.runner.simulate(
            &deal.extracted_fields,
            &request.modified_fields,
            original_risk_score,
        )?;
        tracing::info!(
            deal_id = %deal_id,
            overrides = request.modified_fields.len(),
            change = result.score_change,
            "Scenario simulated"
        );

        Ok(Json(SimulationResponse {
            deal_id,
            original_risk_score,
            result,
        }))
    }

    async fn handle_summary(
        State(state): State<Arc<GatewayState>>,
        Path(deal_id): Path<String>,
    ) -> Result<Json<SummaryResponse>> {
        let deal_id = DealId::from(deal_id);
        let deal = state.find_deal(&deal_id)?;

        let findings = deal
            .risk_assessment
            .as_ref()
            .map(|a| a.validations.as_slice())
            .unwrap_or_default();
        let summary = state.summaries.summarize(deal.risk_score(), findings);

        Ok(Json(SummaryResponse {
            risk_level: risk_level_label(&deal),
            deal_id,
            summary,
            generated_at: Utc::now(),
        }))
    }

    async fn handle_list_deals(State(state): State<Arc<GatewayState>>) -> Json<DealList> {
        Json(DealList::from_deals(state.deals.list()))
    }

    async fn handle_get_deal(
        State(state): State<Arc<GatewayState>>,
        Path(deal_id): Path<String>,
    ) -> Result<Json<Deal>> {
        state.find_deal(&DealId::from(deal_id)).map(Json)
    }

    async fn handle_delete_deal(
        State(state): State<Arc<GatewayState>>,
        Path(deal_id): Path<String>,
    ) -> Result<impl IntoResponse> {
        let deal_id = DealId::from(deal_id);
        state
            .deals
            .delete(&deal_id)
            .ok_or_else(|| GatewayError::DealNotFound(deal_id.to_string()))?;

        Ok(Json(serde_json::json!({
            "message": format!("Deal {deal_id} deleted successfully")
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealcheck_core::{FieldName, FixedRandom};

    fn fixed_state() -> GatewayState {
        GatewayState::with_parts(
            GatewayConfig::default(),
            Arc::new(FixedRandom::new(0, 0.5)),
            Arc::new(InMemoryDealStore::new()),
        )
    }

    fn deal_with_score(engine: &ValidationEngine, record: FieldRecord) -> Deal {
        let mut deal = Deal::new("deal.pdf", record.clone());
        deal.record_assessment(engine.validate(&record).unwrap());
        deal
    }

    #[test]
    fn test_state_uses_configured_rules() {
        let state = fixed_state();
        assert_eq!(state.engine.config(), &state.config.rules);
        assert_eq!(state.deals.count(), 0);
    }

    #[test]
    fn test_missing_deal_is_not_found() {
        let state = fixed_state();
        assert!(matches!(
            state.find_deal(&DealId::from("nope".to_string())),
            Err(GatewayError::DealNotFound(_))
        ));
    }

    #[test]
    fn test_deal_list_buckets_and_order() {
        let state = fixed_state();
        let unvalidated = Deal::new("new.pdf", FieldRecord::new());
        // Everything missing: 20 + 20 + 30 = 70
        let high = deal_with_score(&state.engine, FieldRecord::new());
        let low = deal_with_score(
            &state.engine,
            FieldRecord::new()
                .with(FieldName::Counterparty, "ABC Bank Ltd.")
                .with(FieldName::NotionalAmount, "1000")
                .with(FieldName::InterestRate, "2.0"),
        );

        let list = DealList::from_deals(vec![high, low, unvalidated]);
        assert_eq!(list.total_count, 3);
        assert_eq!(list.high_risk_count, 1);
        assert_eq!(list.medium_risk_count, 0);
        assert_eq!(list.low_risk_count, 2);
        assert!(list
            .deals
            .windows(2)
            .all(|w| w[0].uploaded_at >= w[1].uploaded_at));
        assert!(list.deals.iter().any(|d| d.risk_level == "Unknown"));
    }

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let config = GatewayConfig::default().with_port(0);
        let gateway = Arc::new(Gateway::new(config));

        let server = {
            let gateway = gateway.clone();
            tokio::spawn(async move { gateway.start().await })
        };
        gateway.shutdown();

        let outcome = tokio::time::timeout(std::time::Duration::from_secs(5), server)
            .await
            .expect("gateway did not stop")
            .unwrap();
        assert!(outcome.is_ok());
    }
}
