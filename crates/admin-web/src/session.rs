//! Signed-in administrator sessions.
//!
//! Sessions are held in memory and passed to handlers through `AppState`.
//! Signing in creates one, signing out removes it, and every protected
//! route requires one through the [`CurrentAdmin`] extractor. A session
//! lapses once it is older than the store's TTL; lapsed sessions are
//! dropped the next time anyone signs in.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use database::Admin;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::auth::AuthErrorCode;
use crate::error::AdminError;
use crate::history::CallHistory;
use crate::state::AppState;

/// How long a session stays valid after sign-in.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Who is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub admin_id: String,
    pub name: String,
    pub email: String,
}

struct Entry {
    session: Session,
    started_at: Instant,
    /// Call history window last shown to this session.
    history: Option<CallHistory>,
}

impl Entry {
    fn expired(&self, ttl: Duration) -> bool {
        self.started_at.elapsed() >= ttl
    }
}

/// Live sessions keyed by bearer token.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Start a session for `admin` and return its token.
    pub async fn sign_in(&self, admin: &Admin) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let entry = Entry {
            session: Session {
                admin_id: admin.id.clone(),
                name: admin.name.clone(),
                email: admin.email.clone(),
            },
            started_at: Instant::now(),
            history: None,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.expired(self.ttl));
        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Dropped expired sessions");
        }
        sessions.insert(token.clone(), entry);
        drop(sessions);

        tracing::info!(admin_id = %admin.id, "Admin signed in");
        token
    }

    /// Look up a live session.
    ///
    /// Fails with `UnknownSession` for tokens this store never issued or
    /// has already dropped, and `SessionExpired` for tokens past the TTL.
    pub async fn get(&self, token: &str) -> Result<Session, AuthErrorCode> {
        let sessions = self.sessions.read().await;
        let entry = sessions.get(token).ok_or(AuthErrorCode::UnknownSession)?;
        if entry.expired(self.ttl) {
            return Err(AuthErrorCode::SessionExpired);
        }
        Ok(entry.session.clone())
    }

    /// End a session. Returns false if the token was not live.
    pub async fn sign_out(&self, token: &str) -> bool {
        let removed = self.sessions.write().await.remove(token);
        match &removed {
            Some(entry) if !entry.expired(self.ttl) => {
                tracing::info!(admin_id = %entry.session.admin_id, "Admin signed out");
                true
            }
            _ => false,
        }
    }

    /// The call history window cached for `token`, if any.
    pub async fn history(&self, token: &str) -> Option<CallHistory> {
        self.sessions
            .read()
            .await
            .get(token)
            .and_then(|entry| entry.history.clone())
    }

    /// Remember the call history window shown to `token`.
    pub async fn set_history(&self, token: &str, history: CallHistory) {
        if let Some(entry) = self.sessions.write().await.get_mut(token) {
            entry.history = Some(history);
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Extract a bearer token from the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// The signed-in administrator. Rejects the request with 401 when absent.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub token: String,
    pub session: Session,
}

impl CurrentAdmin {
    pub fn admin_id(&self) -> &str {
        &self.session.admin_id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = AdminError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or(AdminError::Auth(AuthErrorCode::MissingSession))?
            .to_string();

        let session = state
            .sessions
            .get(&token)
            .await
            .map_err(AdminError::Auth)?;

        Ok(Self { token, session })
    }
}
