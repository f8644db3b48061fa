use axum::{Json, extract::State};

use crate::api::responses::HealthResponse;
use crate::state::AppState;

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = state.store.is_connected();
    Json(HealthResponse {
        status: if connected { "Healthy" } else { "Degraded" }.into(),
        cache: if connected { "Connected" } else { "Disconnected" }.into(),
    })
}
