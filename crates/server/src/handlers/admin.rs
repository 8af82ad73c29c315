//! Admin and health endpoints.

use crate::error::ApiResult;
use crate::reconcile::{ReconcileStats, reconcile_orphans};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health - Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state.storage.health_check().await?;
    state.metadata.health_check().await?;

    Ok(Json(HealthResponse { status: "ok" }))
}

/// Reconciliation response.
#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    pub message: String,
    #[serde(flatten)]
    pub stats: ReconcileStats,
}

/// POST /admin/reconcile - Remove records whose files are missing.
pub async fn reconcile(State(state): State<AppState>) -> ApiResult<Json<ReconcileResponse>> {
    let stats = reconcile_orphans(state.metadata.as_ref(), state.storage.as_ref()).await?;

    Ok(Json(ReconcileResponse {
        message: format!("Removed {} orphaned file records", stats.records_removed),
        stats,
    }))
}
