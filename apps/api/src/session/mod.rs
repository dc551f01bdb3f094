//! Session context: which benchmark role a dashboard user is currently looking at.
//!
//! The selection travels with the caller as an `x-session-id` header and lives in a
//! `SessionStore`, never in a process-wide global.

pub mod handlers;

use std::collections::HashMap;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::benchmark::intake::derive_role_id;
use crate::errors::AppError;

pub const SESSION_HEADER: &str = "x-session-id";
/// Selections are forgotten after a day of inactivity.
const SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// The optional session id sent by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHeader(pub Option<Uuid>);

impl SessionHeader {
    pub fn require(self) -> Result<Uuid, AppError> {
        self.0
            .ok_or_else(|| AppError::Validation(format!("{SESSION_HEADER} header is required")))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionHeader
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(SESSION_HEADER) else {
            return Ok(SessionHeader(None));
        };
        let invalid = || AppError::Validation(format!("{SESSION_HEADER} must be a UUID"));
        let raw = raw.to_str().map_err(|_| invalid())?;
        Uuid::parse_str(raw.trim())
            .map(|id| SessionHeader(Some(id)))
            .map_err(|_| invalid())
    }
}

/// Storage for per-session role selection.
///
/// Carried in `AppState` as `Arc<dyn SessionStore>`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn selected_role(&self, session: Uuid) -> Result<Option<String>, AppError>;

    async fn select_role(&self, session: Uuid, role_id: &str) -> Result<(), AppError>;

    fn backend_name(&self) -> &'static str;
}

/// Resolves the role a request is about: an explicit `role_id` wins, otherwise the
/// session's current selection.
///
/// An explicit id is normalized the way intake derives ids, so `Data Analyst` and
/// `data_analyst` name the same role.
pub async fn resolve_role(
    explicit: Option<&str>,
    session: SessionHeader,
    store: &dyn SessionStore,
) -> Result<String, AppError> {
    if let Some(role_id) = explicit.map(derive_role_id).filter(|r| !r.is_empty()) {
        return Ok(role_id);
    }

    if let Some(session) = session.0 {
        if let Some(role_id) = store.selected_role(session).await? {
            return Ok(role_id);
        }
    }

    Err(AppError::NotFound(
        "No benchmark role selected. Define a benchmark role first.".to_string(),
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Redis-backed store
// ────────────────────────────────────────────────────────────────────────────

pub struct RedisSessionStore {
    client: redis::Client,
}

impl RedisSessionStore {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

fn role_key(session: Uuid) -> String {
    format!("talent:session:{session}:role")
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn selected_role(&self, session: Uuid) -> Result<Option<String>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let role: Option<String> = conn.get(role_key(session)).await?;
        Ok(role)
    }

    async fn select_role(&self, session: Uuid, role_id: &str) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(role_key(session), role_id, SESSION_TTL_SECS)
            .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-process store
// ────────────────────────────────────────────────────────────────────────────

/// Used when no Redis is configured. Selections are lost on restart.
#[derive(Default)]
pub struct InMemorySessionStore {
    roles: RwLock<HashMap<Uuid, String>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn selected_role(&self, session: Uuid) -> Result<Option<String>, AppError> {
        Ok(self.roles.read().await.get(&session).cloned())
    }

    async fn select_role(&self, session: Uuid, role_id: &str) -> Result<(), AppError> {
        self.roles
            .write()
            .await
            .insert(session, role_id.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
