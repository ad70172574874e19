//! Document intake API handlers
//!
//! POST /documents/upload, GET /jobs/:job_id/status,
//! GET /documents/:doc_id/entities

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{DocumentExtraction, JobState};
use crate::AppState;

/// POST /documents/upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub job_id: Uuid,
}

/// GET /jobs/:job_id/status response
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub state: JobState,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /documents/upload
///
/// Accept a document and start a raw intake job. Callers poll
/// `/jobs/:job_id/status` and read the extraction once the job exposes
/// its `doc_id`.
pub async fn upload_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let upload = super::read_upload(multipart).await?;
    let job_id = state.intake.submit(upload).await?;
    Ok(Json(UploadResponse { job_id }))
}

/// GET /jobs/:job_id/status
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> ApiResult<Json<JobStatusResponse>> {
    let job = state
        .jobs
        .get(job_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Job not found: {}", job_id)))?;

    Ok(Json(JobStatusResponse {
        state: job.state,
        progress: job.progress,
        doc_id: job.doc_id,
        error: job.error,
    }))
}

/// GET /documents/:doc_id/entities
///
/// Full extraction record for a completed document; 404 until the
/// extraction exists.
pub async fn document_entities(
    State(state): State<AppState>,
    Path(doc_id): Path<Uuid>,
) -> ApiResult<Json<DocumentExtraction>> {
    let extraction = state
        .extractions
        .get(doc_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Document not found: {}", doc_id)))?;
    Ok(Json(extraction))
}

/// Build document intake routes
pub fn document_routes() -> Router<AppState> {
    Router::new()
        .route("/documents/upload", post(upload_document))
        .route("/jobs/:job_id/status", get(job_status))
        .route("/documents/:doc_id/entities", get(document_entities))
}
