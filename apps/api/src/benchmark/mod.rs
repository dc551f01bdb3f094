// Benchmark Intake: validates a role definition and stores it as an upsert keyed by the
// role id. The stored row is what the matching engine reads to parameterize a run.

pub mod handlers;
pub mod intake;
pub mod prompts;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::RwLock;

    use crate::benchmark::store::BenchmarkStore;
    use crate::errors::AppError;
    use crate::models::benchmark::{BenchmarkRow, EmployeeRow};

    /// Mirrors the upsert semantics of the SQL store and counts writes.
    #[derive(Default)]
    pub struct InMemoryBenchmarkStore {
        pub employees: Vec<EmployeeRow>,
        pub rows: RwLock<HashMap<String, BenchmarkRow>>,
        pub writes: AtomicUsize,
    }

    impl InMemoryBenchmarkStore {
        pub fn with_employees(ids: &[&str]) -> Self {
            Self {
                employees: ids
                    .iter()
                    .map(|id| EmployeeRow {
                        employee_id: id.to_string(),
                        fullname: format!("Employee {id}"),
                    })
                    .collect(),
                ..Default::default()
            }
        }

        pub fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        pub async fn stored(&self) -> Vec<BenchmarkRow> {
            let mut rows: Vec<_> = self.rows.read().await.values().cloned().collect();
            rows.sort_by(|a, b| a.job_vacancy_id.cmp(&b.job_vacancy_id));
            rows
        }
    }

    #[async_trait]
    impl BenchmarkStore for InMemoryBenchmarkStore {
        async fn upsert(&self, row: &BenchmarkRow) -> Result<BenchmarkRow, AppError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows.write().await;
            let stored = rows
                .entry(row.job_vacancy_id.clone())
                .and_modify(|existing| {
                    existing.job_level = row.job_level.clone();
                    existing.role_purpose = row.role_purpose.clone();
                    existing.selected_talent_ids = row.selected_talent_ids.clone();
                })
                .or_insert_with(|| row.clone());
            Ok(stored.clone())
        }

        async fn get(&self, role_id: &str) -> Result<Option<BenchmarkRow>, AppError> {
            Ok(self.rows.read().await.get(role_id).cloned())
        }

        async fn list_employees(&self) -> Result<Vec<EmployeeRow>, AppError> {
            Ok(self.employees.clone())
        }

        async fn unknown_employees(&self, ids: &[String]) -> Result<Vec<String>, AppError> {
            Ok(ids
                .iter()
                .filter(|id| !self.employees.iter().any(|e| &e.employee_id == *id))
                .cloned()
                .collect())
        }
    }
}
