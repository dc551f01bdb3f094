use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::errors::AppError;
use crate::matching::{CachedMatches, MatchCache, MatchRetrieval};

/// Cached, time-bounded access to the matching engine. Cheap to clone.
#[derive(Clone)]
pub struct MatchService {
    backend: Arc<dyn MatchRetrieval>,
    cache: Arc<MatchCache>,
    timeout: Duration,
}

impl MatchService {
    pub fn new(backend: Arc<dyn MatchRetrieval>, cache_ttl: Duration, timeout: Duration) -> Self {
        Self {
            backend,
            cache: Arc::new(MatchCache::new(cache_ttl)),
            timeout,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Returns the result set for `role_id`, from cache when fresh.
    ///
    /// Failures, including an unknown role, are never cached. Rows whose fetch overlapped
    /// an invalidation go back to the caller but are not cached.
    pub async fn fetch_matches(&self, role_id: &str) -> Result<CachedMatches, AppError> {
        if let Some(hit) = self.cache.get(role_id).await {
            debug!("Match cache hit for {role_id}");
            return Ok(hit);
        }

        let generation = self.cache.generation(role_id).await;
        let rows = tokio::time::timeout(self.timeout, self.backend.fetch(role_id))
            .await
            .map_err(|_| AppError::Timeout {
                operation: "match query",
                seconds: self.timeout.as_secs(),
            })??;

        info!(
            "Fetched {} match rows for {role_id} via {} engine",
            rows.len(),
            self.backend.backend_name()
        );
        Ok(self.cache.insert(role_id, rows, generation).await)
    }

    /// Forgets the cached result set for `role_id`; called after the benchmark changes.
    pub async fn invalidate(&self, role_id: &str) {
        if self.cache.invalidate(role_id).await {
            debug!("Invalidated cached matches for {role_id}");
        }
    }
}
