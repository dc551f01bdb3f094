use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::models::matching::MatchResultRow;

/// A retrieved result set and the time it was fetched from the engine.
#[derive(Debug, Clone)]
pub struct CachedMatches {
    pub rows: Arc<Vec<MatchResultRow>>,
    pub fetched_at: DateTime<Utc>,
}

struct Entry {
    value: CachedMatches,
    expires_at: Instant,
}

#[derive(Default)]
struct Slots {
    entries: HashMap<String, Entry>,
    /// Bumped by every invalidation of a role.
    generations: HashMap<String, u64>,
}

/// Time-bounded cache of match results keyed by role id.
///
/// Expired entries are dropped on lookup and on every insert. Each role carries a
/// generation counter: a result fetched before an invalidation is never stored after it.
pub struct MatchCache {
    ttl: Duration,
    slots: RwLock<Slots>,
}

impl MatchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: RwLock::new(Slots::default()),
        }
    }

    /// Current generation of `role_id`. Read it before fetching and pass it to `insert`.
    pub async fn generation(&self, role_id: &str) -> u64 {
        self.slots
            .read()
            .await
            .generations
            .get(role_id)
            .copied()
            .unwrap_or(0)
    }

    pub async fn get(&self, role_id: &str) -> Option<CachedMatches> {
        {
            let slots = self.slots.read().await;
            match slots.entries.get(role_id) {
                Some(entry) if Instant::now() < entry.expires_at => {
                    return Some(entry.value.clone())
                }
                Some(_) => {}
                None => return None,
            }
        }

        // expired
        let mut slots = self.slots.write().await;
        if slots
            .entries
            .get(role_id)
            .is_some_and(|e| Instant::now() >= e.expires_at)
        {
            slots.entries.remove(role_id);
        }
        None
    }

    /// Stores `rows` unless `role_id` was invalidated since `generation` was read.
    /// The rows are returned either way.
    pub async fn insert(
        &self,
        role_id: &str,
        rows: Vec<MatchResultRow>,
        generation: u64,
    ) -> CachedMatches {
        let value = CachedMatches {
            rows: Arc::new(rows),
            fetched_at: Utc::now(),
        };
        let now = Instant::now();

        let mut slots = self.slots.write().await;
        slots.entries.retain(|_, e| now < e.expires_at);

        let current = slots.generations.get(role_id).copied().unwrap_or(0);
        if current != generation {
            debug!("Discarding match rows for {role_id} fetched before invalidation");
            return value;
        }

        slots.entries.insert(
            role_id.to_string(),
            Entry {
                value: value.clone(),
                expires_at: now + self.ttl,
            },
        );
        value
    }

    /// Drops the entry for `role_id` and bumps its generation so in-flight fetches are not
    /// stored. Returns whether an entry was present.
    pub async fn invalidate(&self, role_id: &str) -> bool {
        let mut slots = self.slots.write().await;
        *slots.generations.entry(role_id.to_string()).or_insert(0) += 1;
        slots.entries.remove(role_id).is_some()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.slots.read().await.entries.len()
    }
}
