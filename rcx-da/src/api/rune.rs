//! RUNE pipeline API handlers
//!
//! POST /rune/intake, GET /rune/jobs/:id

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::JobState;
use crate::AppState;

/// POST /rune/intake response
#[derive(Debug, Serialize)]
pub struct RuneIntakeResponse {
    pub rune_job_id: Uuid,
}

/// GET /rune/jobs/:id response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuneJobResponse {
    pub state: JobState,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dqi: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /rune/intake
///
/// Accept a document and start a full pipeline run. Returns immediately;
/// processing continues asynchronously and is observed by polling
/// `/rune/jobs/:id`.
pub async fn rune_intake(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<RuneIntakeResponse>> {
    let upload = super::read_upload(multipart).await?;
    let rune_job_id = state.pipeline.submit(upload).await?;
    Ok(Json(RuneIntakeResponse { rune_job_id }))
}

/// GET /rune/jobs/:id
pub async fn rune_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> ApiResult<Json<RuneJobResponse>> {
    let job = state
        .jobs
        .get(job_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Pipeline job not found: {}", job_id)))?;

    Ok(Json(RuneJobResponse {
        state: job.state,
        progress: job.progress,
        doc_id: job.doc_id,
        deal_id: job.deal_id,
        dqi: job.dqi,
        error: job.error,
    }))
}

/// Build RUNE pipeline routes
pub fn rune_routes() -> Router<AppState> {
    Router::new()
        .route("/rune/intake", post(rune_intake))
        .route("/rune/jobs/:id", get(rune_job_status))
}
