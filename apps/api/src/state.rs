use std::sync::Arc;

use crate::benchmark::store::BenchmarkStore;
use crate::llm_client::LlmClient;
use crate::matching::MatchService;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Benchmark roles and the employee directory. Default: `PgBenchmarkStore`.
    pub benchmarks: Arc<dyn BenchmarkStore>,
    /// Matching engine behind a short-lived cache. Backend picked via MATCH_BACKEND.
    pub matches: MatchService,
    /// Per-session role selection. Redis when REDIS_URL is set, otherwise in memory.
    pub sessions: Arc<dyn SessionStore>,
    /// `None` when OPENROUTER_API_KEY is missing; AI endpoints then return a fallback.
    pub llm: Option<LlmClient>,
}
