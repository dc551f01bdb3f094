use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored benchmark role, one row of `talent_benchmarks`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct BenchmarkRow {
    pub job_vacancy_id: String,
    pub role_name: String,
    pub job_level: String,
    pub role_purpose: Option<String>,
    /// Ordered reference employees, 1 to 3 entries.
    pub selected_talent_ids: Vec<String>,
}

/// An entry of the reference-employee picker.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct EmployeeRow {
    pub employee_id: String,
    pub fullname: String,
}
