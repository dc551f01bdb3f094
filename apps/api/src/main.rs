mod benchmark;
mod config;
mod dashboard;
mod db;
mod errors;
mod insights;
mod llm_client;
mod matching;
mod models;
mod projection;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::benchmark::store::PgBenchmarkStore;
use crate::config::{Config, MatchBackend};
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::matching::{MatchRetrieval, MatchService, RpcMatchRetrieval, SqlMatchRetrieval};
use crate::routes::build_router;
use crate::session::{InMemorySessionStore, RedisSessionStore, SessionStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing store credentials)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Talent Match API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize the matching engine backend
    let engine: Arc<dyn MatchRetrieval> = match &config.match_backend {
        MatchBackend::Sql { query_path } => {
            Arc::new(SqlMatchRetrieval::from_file(db.clone(), query_path)?)
        }
        MatchBackend::Rpc {
            base_url,
            function,
            api_key,
        } => Arc::new(RpcMatchRetrieval::new(base_url, function, api_key.clone())?),
    };
    let matches = MatchService::new(
        engine,
        config.match_cache_ttl,
        config.match_query_timeout,
    );
    info!(
        "Matching engine initialized (backend: {}, cache ttl: {}s, timeout: {}s)",
        matches.backend_name(),
        config.match_cache_ttl.as_secs(),
        config.match_query_timeout.as_secs()
    );

    // Initialize session store
    let sessions: Arc<dyn SessionStore> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Redis session store initialized");
            Arc::new(RedisSessionStore::new(client))
        }
        None => {
            warn!("REDIS_URL not set: session selections are kept in memory");
            Arc::new(InMemorySessionStore::default())
        }
    };

    // Initialize LLM client (optional)
    let llm = match &config.openrouter_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            warn!("OPENROUTER_API_KEY not set: AI features are disabled");
            None
        }
    };

    let state = AppState {
        benchmarks: Arc::new(PgBenchmarkStore::new(db)),
        matches,
        sessions,
        llm,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
