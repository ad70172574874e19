//! rcx-da library interface for testing
//!
//! Exposes public APIs for integration testing

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::DaConfig;
use crate::services::{IntakeService, RunePipeline};
use crate::store::{DealStore, ExtractionStore, JobStore};

/// Headroom on top of the upload cap for multipart framing, so slightly
/// oversized files get the service's own 400 instead of a bare 413
const BODY_LIMIT_HEADROOM: usize = 64 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jobs: JobStore,
    pub extractions: ExtractionStore,
    pub deals: DealStore,
    pub intake: IntakeService,
    pub pipeline: RunePipeline,
    pub config: DaConfig,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Cancelled on shutdown; in-flight pipeline runs observe it
    pub shutdown: CancellationToken,
}

impl AppState {
    /// Wire up stores and services for one serving process
    pub fn new(config: DaConfig) -> Self {
        let jobs = JobStore::new();
        let extractions = ExtractionStore::new();
        let deals = DealStore::new();
        let shutdown = CancellationToken::new();

        let intake = IntakeService::new(jobs.clone(), extractions.clone(), config.intake.clone());
        let pipeline = RunePipeline::new(
            jobs.clone(),
            extractions.clone(),
            deals.clone(),
            intake.clone(),
            config.pipeline.clone(),
            shutdown.clone(),
        );

        Self {
            jobs,
            extractions,
            deals,
            intake,
            pipeline,
            config,
            startup_time: Utc::now(),
            shutdown,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.intake.max_upload_bytes + BODY_LIMIT_HEADROOM;

    Router::new()
        .merge(api::document_routes())
        .merge(api::rune_routes())
        .merge(api::deal_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
