use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::benchmark::{BenchmarkRow, EmployeeRow};

/// Persistence for benchmark roles and the read-only employee directory.
///
/// Carried in `AppState` as `Arc<dyn BenchmarkStore>`.
#[async_trait]
pub trait BenchmarkStore: Send + Sync {
    /// Inserts the role, or on an existing `job_vacancy_id` overwrites its job level,
    /// purpose and reference employees. Returns the row as stored.
    async fn upsert(&self, row: &BenchmarkRow) -> Result<BenchmarkRow, AppError>;

    async fn get(&self, role_id: &str) -> Result<Option<BenchmarkRow>, AppError>;

    async fn list_employees(&self) -> Result<Vec<EmployeeRow>, AppError>;

    /// The subset of `ids` with no row in `employees`, in input order.
    async fn unknown_employees(&self, ids: &[String]) -> Result<Vec<String>, AppError>;
}

pub struct PgBenchmarkStore {
    pool: PgPool,
}

impl PgBenchmarkStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BenchmarkStore for PgBenchmarkStore {
    async fn upsert(&self, row: &BenchmarkRow) -> Result<BenchmarkRow, AppError> {
        // role_name keeps its first value; the id was derived from it.
        let stored = sqlx::query_as::<_, BenchmarkRow>(
            r#"
            INSERT INTO talent_benchmarks
                (job_vacancy_id, role_name, job_level, role_purpose, selected_talent_ids)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (job_vacancy_id) DO UPDATE
            SET job_level = EXCLUDED.job_level,
                role_purpose = EXCLUDED.role_purpose,
                selected_talent_ids = EXCLUDED.selected_talent_ids
            RETURNING job_vacancy_id, role_name, job_level, role_purpose, selected_talent_ids
            "#,
        )
        .bind(&row.job_vacancy_id)
        .bind(&row.role_name)
        .bind(&row.job_level)
        .bind(&row.role_purpose)
        .bind(&row.selected_talent_ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn get(&self, role_id: &str) -> Result<Option<BenchmarkRow>, AppError> {
        Ok(sqlx::query_as::<_, BenchmarkRow>(
            r#"
            SELECT job_vacancy_id, role_name, job_level, role_purpose, selected_talent_ids
            FROM talent_benchmarks
            WHERE job_vacancy_id = $1
            "#,
        )
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_employees(&self) -> Result<Vec<EmployeeRow>, AppError> {
        Ok(sqlx::query_as::<_, EmployeeRow>(
            "SELECT DISTINCT employee_id, fullname FROM employees ORDER BY employee_id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn unknown_employees(&self, ids: &[String]) -> Result<Vec<String>, AppError> {
        Ok(sqlx::query_scalar::<_, String>(
            r#"
            SELECT wanted.id
            FROM UNNEST($1::text[]) WITH ORDINALITY AS wanted(id, pos)
            WHERE NOT EXISTS (SELECT 1 FROM employees e WHERE e.employee_id = wanted.id)
            ORDER BY wanted.pos
            "#,
        )
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?)
    }
}
