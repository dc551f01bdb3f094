use std::collections::HashSet;

use serde::Deserialize;
use tracing::info;

use crate::benchmark::store::BenchmarkStore;
use crate::errors::AppError;
use crate::matching::MatchService;
use crate::models::benchmark::BenchmarkRow;

pub const MAX_REFERENCE_EMPLOYEES: usize = 3;

/// A benchmark role as submitted from the intake form.
#[derive(Debug, Clone, Deserialize)]
pub struct BenchmarkInput {
    /// Explicit role id. Derived from `role_name` when absent.
    #[serde(default)]
    pub role_id: Option<String>,
    pub role_name: String,
    pub job_level: String,
    #[serde(default)]
    pub role_purpose: String,
    pub reference_employee_ids: Vec<String>,
}

/// Derives a stable role id: lowercase, runs of anything but letters and digits collapse
/// to a single `_`, no leading or trailing `_`.
///
/// `"Sr. Data-Analyst (Ops)"` becomes `"sr_data_analyst_ops"`.
pub fn derive_role_id(raw: &str) -> String {
    let mut id = String::with_capacity(raw.len());
    let mut pending_sep = false;

    for c in raw.trim().chars() {
        if c.is_alphanumeric() {
            if pending_sep && !id.is_empty() {
                id.push('_');
            }
            pending_sep = false;
            id.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }

    id
}

/// Checks a submission and builds the row to store. Every problem is reported at once.
///
/// Rules:
/// - role name and job level are required
/// - the role id (explicit or derived) must be non-empty after normalization
/// - 1 to 3 reference employees, none blank, no id repeated
pub fn validate(input: &BenchmarkInput) -> Result<BenchmarkRow, AppError> {
    let mut problems: Vec<String> = Vec::new();

    let role_name = input.role_name.trim();
    if role_name.is_empty() {
        problems.push("role_name cannot be empty".to_string());
    }

    let job_level = input.job_level.trim();
    if job_level.is_empty() {
        problems.push("job_level cannot be empty".to_string());
    }

    let role_id = match input.role_id.as_deref().map(str::trim) {
        Some(explicit) if !explicit.is_empty() => derive_role_id(explicit),
        _ => derive_role_id(role_name),
    };
    if role_id.is_empty() && !role_name.is_empty() {
        problems.push("role id must contain at least one letter or digit".to_string());
    }

    let ids: Vec<String> = input
        .reference_employee_ids
        .iter()
        .map(|id| id.trim().to_string())
        .collect();

    if ids.is_empty() || ids.len() > MAX_REFERENCE_EMPLOYEES {
        problems.push(format!(
            "select between 1 and {MAX_REFERENCE_EMPLOYEES} benchmark employees, got {}",
            ids.len()
        ));
    }
    if ids.iter().any(|id| id.is_empty()) {
        problems.push("benchmark employee ids cannot be blank".to_string());
    }

    let mut seen = HashSet::new();
    let duplicates: Vec<&str> = ids
        .iter()
        .filter(|id| !id.is_empty() && !seen.insert(id.as_str()))
        .map(String::as_str)
        .collect();
    if !duplicates.is_empty() {
        problems.push(format!(
            "benchmark employees must be distinct, repeated: {}",
            duplicates.join(", ")
        ));
    }

    if !problems.is_empty() {
        return Err(AppError::Validation(problems.join("; ")));
    }

    let role_purpose = input.role_purpose.trim();
    Ok(BenchmarkRow {
        job_vacancy_id: role_id,
        role_name: role_name.to_string(),
        job_level: job_level.to_string(),
        role_purpose: (!role_purpose.is_empty()).then(|| role_purpose.to_string()),
        selected_talent_ids: ids,
    })
}

/// Validates and stores a benchmark role, then drops any cached match results for it.
///
/// Nothing is written unless every check passes, including that each reference employee
/// exists. Store failures are returned as-is and never retried.
pub async fn save_benchmark(
    store: &dyn BenchmarkStore,
    matches: &MatchService,
    input: BenchmarkInput,
) -> Result<BenchmarkRow, AppError> {
    let row = validate(&input)?;

    let unknown = store.unknown_employees(&row.selected_talent_ids).await?;
    if !unknown.is_empty() {
        return Err(AppError::Validation(format!(
            "unknown benchmark employees: {}",
            unknown.join(", ")
        )));
    }

    let stored = store.upsert(&row).await?;
    matches.invalidate(&stored.job_vacancy_id).await;

    info!(
        "Saved benchmark {} ({} reference employees)",
        stored.job_vacancy_id,
        stored.selected_talent_ids.len()
    );
    Ok(stored)
}
