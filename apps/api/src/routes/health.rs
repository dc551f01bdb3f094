use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version and which collaborators are wired in.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "talent-match-api",
        "match_backend": state.matches.backend_name(),
        "session_store": state.sessions.backend_name(),
        "ai_enabled": state.llm.is_some()
    }))
}
