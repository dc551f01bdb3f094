//! Axum route handlers for the Benchmark API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::benchmark::intake::{derive_role_id, save_benchmark, BenchmarkInput};
use crate::benchmark::prompts::build_job_profile_prompt;
use crate::errors::AppError;
use crate::llm_client::prompts::HR_ANALYST_SYSTEM;
use crate::llm_client::{generate_or_fallback, Narrative};
use crate::models::benchmark::{BenchmarkRow, EmployeeRow};
use crate::session::SessionHeader;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SaveBenchmarkResponse {
    pub role_id: String,
    pub benchmark: BenchmarkRow,
    /// Whether the caller's session now points at this role.
    pub session_updated: bool,
}

#[derive(Debug, Deserialize)]
pub struct JobProfileRequest {
    pub role_name: String,
    #[serde(default)]
    pub job_level: String,
    #[serde(default)]
    pub role_purpose: String,
}

/// GET /api/v1/employees
///
/// Candidates for the reference-employee picker.
pub async fn handle_list_employees(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmployeeRow>>, AppError> {
    Ok(Json(state.benchmarks.list_employees().await?))
}

/// POST /api/v1/benchmarks
///
/// Stores the role and, when a session is given, selects it for the following pages.
pub async fn handle_save_benchmark(
    State(state): State<AppState>,
    session: SessionHeader,
    Json(input): Json<BenchmarkInput>,
) -> Result<(StatusCode, Json<SaveBenchmarkResponse>), AppError> {
    let benchmark = save_benchmark(state.benchmarks.as_ref(), &state.matches, input).await?;

    // The row is already written, so a session store failure only loses the selection.
    let session_updated = match session.0 {
        Some(id) => match state
            .sessions
            .select_role(id, &benchmark.job_vacancy_id)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!("Benchmark saved but session {id} was not updated: {e}");
                false
            }
        },
        None => false,
    };

    Ok((
        StatusCode::CREATED,
        Json(SaveBenchmarkResponse {
            role_id: benchmark.job_vacancy_id.clone(),
            benchmark,
            session_updated,
        }),
    ))
}

/// GET /api/v1/benchmarks/:role_id
pub async fn handle_get_benchmark(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> Result<Json<BenchmarkRow>, AppError> {
    let role_id = derive_role_id(&role_id);
    state
        .benchmarks
        .get(&role_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Benchmark role '{role_id}' not found")))
}

/// POST /api/v1/benchmarks/profile
///
/// AI-written job profile for a role. Degrades to a message when AI is unavailable.
pub async fn handle_job_profile(
    State(state): State<AppState>,
    Json(request): Json<JobProfileRequest>,
) -> Result<Json<Narrative>, AppError> {
    if request.role_name.trim().is_empty() {
        return Err(AppError::Validation("role_name cannot be empty".to_string()));
    }

    let prompt =
        build_job_profile_prompt(&request.role_name, &request.job_level, &request.role_purpose);
    let narrative =
        generate_or_fallback(state.llm.as_ref(), &prompt, Some(HR_ANALYST_SYSTEM)).await;

    Ok(Json(narrative))
}
