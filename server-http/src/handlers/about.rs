use axum::extract::State;

use crate::state::AppState;

/// GET /api/About
pub async fn about(State(state): State<AppState>) -> String {
    format!("Market Data Service v{}", state.service_version)
}
