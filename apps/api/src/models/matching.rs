use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the matching engine output: a (candidate, talent group variable) pair,
/// optionally broken down to a single talent variable.
///
/// The engine must emit rates as `double precision`; `final_match_rate` is the same for
/// every row of a candidate within one retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct MatchResultRow {
    pub candidate_id: String,
    pub fullname: String,
    #[sqlx(default)]
    #[serde(default)]
    pub directorate: Option<String>,
    #[sqlx(default)]
    #[serde(default)]
    pub grade: Option<String>,
    pub tgv_name: String,
    pub tgv_match_rate: f64,
    pub final_match_rate: f64,
    #[sqlx(default)]
    #[serde(default)]
    pub tv_name: Option<String>,
    #[sqlx(default)]
    #[serde(default)]
    pub baseline_score: Option<f64>,
    #[sqlx(default)]
    #[serde(default)]
    pub user_score: Option<f64>,
    #[sqlx(default)]
    #[serde(default)]
    pub tv_match_rate: Option<f64>,
}
