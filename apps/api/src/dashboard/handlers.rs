//! Axum route handlers for the Dashboard API.

use std::collections::BTreeSet;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dashboard::{load_matches, split_list};
use crate::errors::AppError;
use crate::models::matching::MatchResultRow;
use crate::projection::{
    filter_rows, final_rate_histogram, group_labels, mean_final_by, per_variable_benchmark,
    pivot_by_group, summarize, Dimension, GroupAverage, HistogramBin, MatchSummary,
    PivotedCandidateRow, VariableBenchmark,
};
use crate::session::SessionHeader;
use crate::state::AppState;

const DEFAULT_BINS: usize = 25;
const MAX_BINS: usize = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub role_id: Option<String>,
    /// Comma-separated directorates to keep.
    pub directorate: Option<String>,
    /// Comma-separated grades to keep.
    pub grade: Option<String>,
    pub bins: Option<usize>,
}

/// Values the directorate and grade filters can take, from the unfiltered result set.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FilterOptions {
    pub directorates: Vec<String>,
    pub grades: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub role_id: String,
    pub data_as_of: DateTime<Utc>,
    pub summary: MatchSummary,
    pub histogram: Vec<HistogramBin>,
    pub by_directorate: Vec<GroupAverage>,
    pub by_grade: Vec<GroupAverage>,
    pub filter_options: FilterOptions,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComparisonResponse {
    pub role_id: String,
    pub data_as_of: DateTime<Utc>,
    pub group_labels: Vec<String>,
    pub candidates: Vec<PivotedCandidateRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TalentVariablesResponse {
    pub role_id: String,
    pub data_as_of: DateTime<Utc>,
    pub variables: Vec<VariableBenchmark>,
}

fn filter_options(rows: &[MatchResultRow]) -> FilterOptions {
    FilterOptions {
        directorates: distinct_values(rows.iter().filter_map(|r| r.directorate.as_ref())),
        grades: distinct_values(rows.iter().filter_map(|r| r.grade.as_ref())),
    }
}

fn distinct_values<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn apply_filters(rows: &[MatchResultRow], query: &DashboardQuery) -> Vec<MatchResultRow> {
    filter_rows(
        rows,
        &split_list(query.directorate.as_deref()),
        &split_list(query.grade.as_deref()),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/dashboard/overview
///
/// Headline numbers, final-rate distribution and averages per directorate and grade.
pub async fn handle_overview(
    State(state): State<AppState>,
    session: SessionHeader,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<OverviewResponse>, AppError> {
    let (role_id, matches) = load_matches(&state, query.role_id.as_deref(), session).await?;
    let rows = apply_filters(&matches.rows, &query);
    let bins = query.bins.unwrap_or(DEFAULT_BINS).clamp(1, MAX_BINS);

    Ok(Json(OverviewResponse {
        role_id,
        data_as_of: matches.fetched_at,
        summary: summarize(&rows),
        histogram: final_rate_histogram(&rows, bins),
        by_directorate: mean_final_by(&rows, Dimension::Directorate),
        by_grade: mean_final_by(&rows, Dimension::Grade),
        filter_options: filter_options(&matches.rows),
    }))
}

/// GET /api/v1/dashboard/comparison
///
/// One row per candidate with a column per group label, for cross-group scatter plots.
pub async fn handle_comparison(
    State(state): State<AppState>,
    session: SessionHeader,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ComparisonResponse>, AppError> {
    let (role_id, matches) = load_matches(&state, query.role_id.as_deref(), session).await?;
    let rows = apply_filters(&matches.rows, &query);

    Ok(Json(ComparisonResponse {
        role_id,
        data_as_of: matches.fetched_at,
        group_labels: group_labels(&rows),
        candidates: pivot_by_group(&rows),
    }))
}

/// GET /api/v1/dashboard/talent-variables
pub async fn handle_talent_variables(
    State(state): State<AppState>,
    session: SessionHeader,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<TalentVariablesResponse>, AppError> {
    let (role_id, matches) = load_matches(&state, query.role_id.as_deref(), session).await?;
    let rows = apply_filters(&matches.rows, &query);

    Ok(Json(TalentVariablesResponse {
        role_id,
        data_as_of: matches.fetched_at,
        variables: per_variable_benchmark(&rows),
    }))
}
