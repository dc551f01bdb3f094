use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use sqlx::PgPool;
use tracing::debug;

use crate::errors::AppError;
use crate::models::matching::MatchResultRow;

/// Bind marker the SQL template must use for the role id.
const ROLE_ID_BIND: &str = "$1";

/// A matching engine backend. Implement this to swap the engine without touching the
/// cache, the handlers, or the projections.
///
/// Carried in `MatchService` as `Arc<dyn MatchRetrieval>`, chosen once at startup.
#[async_trait]
pub trait MatchRetrieval: Send + Sync {
    /// Returns every (candidate, group) row the engine produces for `role_id`.
    /// An empty vector means the role exists but nobody matched.
    async fn fetch(&self, role_id: &str) -> Result<Vec<MatchResultRow>, AppError>;

    fn backend_name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// SQL template backend
// ────────────────────────────────────────────────────────────────────────────

/// Runs a query template against the store with the role id bound as `$1`.
/// The role id is never formatted into the query text.
pub struct SqlMatchRetrieval {
    pool: PgPool,
    template: String,
}

impl SqlMatchRetrieval {
    pub fn new(pool: PgPool, template: String) -> Result<Self, AppError> {
        validate_template(&template)?;
        Ok(Self { pool, template })
    }

    pub fn from_file(pool: PgPool, path: &Path) -> anyhow::Result<Self> {
        let template = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read match query template {}", path.display()))?;
        Self::new(pool, template).map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
    }
}

/// Rejects templates that cannot be executed with a single bound parameter.
pub fn validate_template(template: &str) -> Result<(), AppError> {
    if template.trim().is_empty() {
        return Err(AppError::Configuration(
            "match query template is empty".to_string(),
        ));
    }
    if template.contains(":job_vacancy_id") {
        return Err(AppError::Configuration(
            "match query template uses the named placeholder ':job_vacancy_id'; bind the role id as $1"
                .to_string(),
        ));
    }
    if !template.contains(ROLE_ID_BIND) {
        return Err(AppError::Configuration(
            "match query template must reference the role id as $1".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl MatchRetrieval for SqlMatchRetrieval {
    async fn fetch(&self, role_id: &str) -> Result<Vec<MatchResultRow>, AppError> {
        let known: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM talent_benchmarks WHERE job_vacancy_id = $1)",
        )
        .bind(role_id)
        .fetch_one(&self.pool)
        .await?;

        if !known {
            return Err(AppError::NotFound(format!(
                "Benchmark role '{role_id}' not found"
            )));
        }

        let rows = sqlx::query_as::<_, MatchResultRow>(&self.template)
            .bind(role_id)
            .fetch_all(&self.pool)
            .await?;

        debug!("SQL engine returned {} rows for {role_id}", rows.len());
        Ok(rows)
    }

    fn backend_name(&self) -> &'static str {
        "sql"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Remote procedure backend
// ────────────────────────────────────────────────────────────────────────────

/// Calls a named database function over HTTP (`POST {base}/rest/v1/rpc/{function}`)
/// with the role id as a JSON argument.
///
/// The procedure cannot tell an unknown role from a role with no matches, so both come
/// back as an empty vector.
#[derive(Clone)]
pub struct RpcMatchRetrieval {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RpcMatchRetrieval {
    pub fn new(base_url: &str, function: &str, api_key: Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .build()
                .context("Failed to build RPC HTTP client")?,
            endpoint: rpc_endpoint(base_url, function),
            api_key,
        })
    }
}

fn rpc_endpoint(base_url: &str, function: &str) -> String {
    format!("{}/rest/v1/rpc/{}", base_url.trim_end_matches('/'), function)
}

#[async_trait]
impl MatchRetrieval for RpcMatchRetrieval {
    async fn fetch(&self, role_id: &str) -> Result<Vec<MatchResultRow>, AppError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "job_vacancy_id": role_id }));
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Integration(format!("RPC call failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Integration(format!(
                "RPC returned {status}: {body}"
            )));
        }

        let rows: Vec<MatchResultRow> = response
            .json()
            .await
            .map_err(|e| AppError::Integration(format!("RPC payload could not be decoded: {e}")))?;

        debug!("RPC engine returned {} rows for {role_id}", rows.len());
        Ok(rows)
    }

    fn backend_name(&self) -> &'static str {
        "rpc"
    }
}
