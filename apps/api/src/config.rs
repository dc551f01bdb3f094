use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Upper bound on how long a match result set may be served from cache.
pub const MAX_CACHE_TTL_SECS: u64 = 600;
const MIN_QUERY_TIMEOUT_SECS: u64 = 10;
const MAX_QUERY_TIMEOUT_SECS: u64 = 30;

/// Which matching engine backend answers `fetch_matches`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchBackend {
    /// Templated SQL executed against the store with the role id bound as `$1`.
    Sql { query_path: PathBuf },
    /// Named remote procedure exposed over HTTP.
    Rpc {
        base_url: String,
        function: String,
        api_key: Option<String>,
    },
}

/// Application configuration loaded from environment variables.
/// Fails at startup if the store credentials are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Optional: AI features are disabled when absent.
    pub openrouter_api_key: Option<String>,
    /// Optional: sessions fall back to process memory when absent.
    pub redis_url: Option<String>,
    pub match_backend: MatchBackend,
    pub match_cache_ttl: Duration,
    pub match_query_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests never touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL")
            .context("Required environment variable 'DATABASE_URL' is not set")?;

        let match_backend = match get("MATCH_BACKEND").as_deref().unwrap_or("sql") {
            "sql" => MatchBackend::Sql {
                query_path: PathBuf::from(
                    get("MATCH_QUERY_PATH")
                        .unwrap_or_else(|| "queries/match_results.sql".to_string()),
                ),
            },
            "rpc" => MatchBackend::Rpc {
                base_url: get("MATCH_RPC_URL")
                    .context("MATCH_RPC_URL is required when MATCH_BACKEND=rpc")?,
                function: get("MATCH_RPC_FUNCTION")
                    .unwrap_or_else(|| "talent_match_results".to_string()),
                api_key: get("MATCH_RPC_KEY"),
            },
            other => bail!("MATCH_BACKEND must be 'sql' or 'rpc', got '{other}'"),
        };

        let cache_secs = parse_secs(get("MATCH_CACHE_TTL_SECS"), MAX_CACHE_TTL_SECS)
            .context("MATCH_CACHE_TTL_SECS must be a whole number of seconds")?
            .min(MAX_CACHE_TTL_SECS);
        let timeout_secs = parse_secs(get("MATCH_QUERY_TIMEOUT_SECS"), 20)
            .context("MATCH_QUERY_TIMEOUT_SECS must be a whole number of seconds")?
            .clamp(MIN_QUERY_TIMEOUT_SECS, MAX_QUERY_TIMEOUT_SECS);

        Ok(Config {
            database_url,
            openrouter_api_key: get("OPENROUTER_API_KEY"),
            redis_url: get("REDIS_URL"),
            match_backend,
            match_cache_ttl: Duration::from_secs(cache_secs),
            match_query_timeout: Duration::from_secs(timeout_secs),
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_secs(raw: Option<String>, default: u64) -> Result<u64> {
    match raw {
        Some(v) => Ok(v.trim().parse::<u64>()?),
        None => Ok(default),
    }
}
