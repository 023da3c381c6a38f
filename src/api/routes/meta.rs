//! Meta endpoints: liveness, status counters and the endpoint catalog.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::state::ApiState;
use crate::catalog::{EndpointDoc, ENDPOINTS};

/// GET /health
pub async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub challenges: usize,
    pub attempts: u64,
    pub correct: u64,
    pub started_at: DateTime<Utc>,
}

/// GET /status
pub async fn server_status(State(state): State<Arc<ApiState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running".to_string(),
        challenges: state.challenges.len(),
        attempts: state.attempts.load(Ordering::Relaxed),
        correct: state.correct.load(Ordering::Relaxed),
        started_at: state.started_at,
    })
}

/// GET /endpoints
pub async fn list_endpoints() -> Json<&'static [EndpointDoc]> {
    Json(ENDPOINTS)
}
