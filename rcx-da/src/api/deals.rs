//! Deal API handlers
//!
//! GET /deals, GET /deals/:id

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::Deal;
use crate::AppState;

/// GET /deals
///
/// All deals, newest first.
pub async fn list_deals(State(state): State<AppState>) -> Json<Vec<Deal>> {
    Json(state.deals.list().await)
}

/// GET /deals/:id
pub async fn get_deal(
    State(state): State<AppState>,
    Path(deal_id): Path<Uuid>,
) -> ApiResult<Json<Deal>> {
    let deal = state
        .deals
        .get(deal_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Deal not found: {}", deal_id)))?;
    Ok(Json(deal))
}

/// Build deal routes
pub fn deal_routes() -> Router<AppState> {
    Router::new()
        .route("/deals", get(list_deals))
        .route("/deals/:id", get(get_deal))
}
