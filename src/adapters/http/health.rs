//! Liveness endpoint.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;

/// Hub liveness and load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub connections: usize,
    pub channels: usize,
}

/// GET /health - Report hub status and live connection counts
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.hub.is_shutting_down() {
        "shutting_down"
    } else {
        "ok"
    };
    let registry = state.hub.registry();

    Json(HealthResponse {
        status: status.to_string(),
        connections: registry.connection_count(),
        channels: registry.channel_count(),
    })
}
