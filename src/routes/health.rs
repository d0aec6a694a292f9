//! Health check endpoints for liveness and readiness probes.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::ApiResponse;
use crate::AppState;

/// Readiness probe detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub users: usize,
    pub items: usize,
    pub jobs: usize,
    pub campaigns: usize,
}

/// Liveness probe: always returns OK if the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness probe: reports the row count of every table.
pub async fn ready(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let store = &state.store;
    ApiResponse::success(HealthStatus {
        status: "ok".to_string(),
        users: store.users.len().await,
        items: store.items.len().await,
        jobs: store.jobs.len().await,
        campaigns: store.campaigns.len().await,
    })
}
