//! Axum route handlers for the Insights API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dashboard::load_matches;
use crate::errors::AppError;
use crate::insights::prompts::{build_insight_prompt, SUMMARY_CANDIDATES};
use crate::llm_client::prompts::HR_ANALYST_SYSTEM;
use crate::llm_client::{generate_or_fallback, Narrative};
use crate::projection::{radar_coordinates, top_n, CandidateSummary, RadarPoint};
use crate::session::SessionHeader;
use crate::state::AppState;

const DEFAULT_TOP_N: usize = 5;
const MAX_TOP_N: usize = 100;

pub const NO_CANDIDATES_MESSAGE: &str = "No candidates matched this benchmark yet.";

#[derive(Debug, Default, Deserialize)]
pub struct TopQuery {
    pub role_id: Option<String>,
    pub n: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RoleQuery {
    pub role_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub role_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopCandidatesResponse {
    pub role_id: String,
    pub data_as_of: DateTime<Utc>,
    pub candidates: Vec<CandidateSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RadarResponse {
    pub role_id: String,
    pub candidate_id: String,
    pub fullname: String,
    pub final_match_rate: f64,
    pub axes: Vec<RadarPoint>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsightSummaryResponse {
    pub role_id: String,
    pub top_candidates: Vec<CandidateSummary>,
    pub narrative: Narrative,
}

/// GET /api/v1/insights/top
pub async fn handle_top_candidates(
    State(state): State<AppState>,
    session: SessionHeader,
    Query(query): Query<TopQuery>,
) -> Result<Json<TopCandidatesResponse>, AppError> {
    let (role_id, matches) = load_matches(&state, query.role_id.as_deref(), session).await?;
    let n = query.n.unwrap_or(DEFAULT_TOP_N).clamp(1, MAX_TOP_N);

    Ok(Json(TopCandidatesResponse {
        role_id,
        data_as_of: matches.fetched_at,
        candidates: top_n(&matches.rows, n),
    }))
}

/// GET /api/v1/insights/radar/:candidate_id
pub async fn handle_radar(
    State(state): State<AppState>,
    session: SessionHeader,
    Path(candidate_id): Path<String>,
    Query(query): Query<RoleQuery>,
) -> Result<Json<RadarResponse>, AppError> {
    let (role_id, matches) = load_matches(&state, query.role_id.as_deref(), session).await?;

    let identity = matches
        .rows
        .iter()
        .filter(|r| r.candidate_id == candidate_id)
        .max_by(|a, b| a.final_match_rate.total_cmp(&b.final_match_rate))
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Candidate '{candidate_id}' has no match results for '{role_id}'"
            ))
        })?;

    Ok(Json(RadarResponse {
        fullname: identity.fullname.clone(),
        final_match_rate: identity.final_match_rate,
        axes: radar_coordinates(&matches.rows, &candidate_id),
        candidate_id,
        role_id,
    }))
}

/// POST /api/v1/insights/summary
///
/// Narrative over the top candidates. The AI service is called at most once and any
/// failure becomes a fallback message inside a successful response.
pub async fn handle_insight_summary(
    State(state): State<AppState>,
    session: SessionHeader,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<InsightSummaryResponse>, AppError> {
    let (role_id, matches) = load_matches(&state, request.role_id.as_deref(), session).await?;
    let top_candidates = top_n(&matches.rows, SUMMARY_CANDIDATES);

    let narrative = if top_candidates.is_empty() {
        Narrative::fallback(NO_CANDIDATES_MESSAGE.to_string())
    } else {
        let role_name = state.benchmarks.get(&role_id).await?.map(|b| b.role_name);
        let prompt = build_insight_prompt(&role_id, role_name.as_deref(), &top_candidates);
        generate_or_fallback(state.llm.as_ref(), &prompt, Some(HR_ANALYST_SYSTEM)).await
    };

    Ok(Json(InsightSummaryResponse {
        role_id,
        top_candidates,
        narrative,
    }))
}
