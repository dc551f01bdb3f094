//! Axum route handlers for the Session API.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::benchmark::intake::derive_role_id;
use crate::errors::AppError;
use crate::session::SessionHeader;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub selected_role_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectRoleRequest {
    pub role_id: String,
}

/// POST /api/v1/session
pub async fn handle_create_session() -> (StatusCode, Json<SessionResponse>) {
    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id: Uuid::new_v4(),
            selected_role_id: None,
        }),
    )
}

/// GET /api/v1/session
pub async fn handle_get_session(
    State(state): State<AppState>,
    session: SessionHeader,
) -> Result<Json<SessionResponse>, AppError> {
    let session_id = session.require()?;
    let selected_role_id = state.sessions.selected_role(session_id).await?;
    Ok(Json(SessionResponse {
        session_id,
        selected_role_id,
    }))
}

/// PUT /api/v1/session/role
///
/// Points the session at an existing benchmark role. The id is normalized like intake ids.
pub async fn handle_select_role(
    State(state): State<AppState>,
    session: SessionHeader,
    Json(request): Json<SelectRoleRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session_id = session.require()?;
    let role_id = derive_role_id(&request.role_id);
    if role_id.is_empty() {
        return Err(AppError::Validation("role_id cannot be empty".to_string()));
    }

    if state.benchmarks.get(&role_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Benchmark role '{role_id}' not found"
        )));
    }

    state.sessions.select_role(session_id, &role_id).await?;
    Ok(Json(SessionResponse {
        session_id,
        selected_role_id: Some(role_id),
    }))
}
