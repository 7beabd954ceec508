//! CSRF tokens backed by an injected keyed store
//!
//! Tokens are issued per session id and expire after a TTL. The store is a
//! trait object held by the application state, so several server instances
//! can share one backing store instead of each keeping a private map.

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::{DeskError, DeskResult, RequestError};

pub const SESSION_HEADER: &str = "x-session-id";
pub const TOKEN_HEADER: &str = "x-csrf-token";

/// Keyed token store with expiry
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Issue a fresh token for `session`, replacing any previous one
    async fn issue(&self, session: &str) -> DeskResult<String>;

    /// Whether `token` is the live token for `session`
    async fn verify(&self, session: &str, token: &str) -> DeskResult<bool>;

    /// Drop expired tokens, returning how many were removed
    async fn purge_expired(&self) -> DeskResult<usize>;
}

/// In-memory token store for single-instance deployments and tests
pub struct InMemoryTokenStore {
    ttl: Duration,
    tokens: RwLock<HashMap<String, (String, Instant)>>,
}

impl InMemoryTokenStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            tokens: RwLock::new(HashMap::new()),
        }
    }

    fn is_expired(&self, issued_at: Instant) -> bool {
        issued_at.elapsed() >= self.ttl
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn issue(&self, session: &str) -> DeskResult<String> {
        let token = Uuid::new_v4().simple().to_string();
        let mut tokens = self.tokens.write().await;
        tokens.insert(session.to_string(), (token.clone(), Instant::now()));
        Ok(token)
    }

    async fn verify(&self, session: &str, token: &str) -> DeskResult<bool> {
        let tokens = self.tokens.read().await;
        Ok(match tokens.get(session) {
            Some((expected, issued_at)) => expected == token && !self.is_expired(*issued_at),
            None => false,
        })
    }

    async fn purge_expired(&self) -> DeskResult<usize> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, (_, issued_at)| !self.is_expired(*issued_at));
        Ok(before - tokens.len())
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Middleware: mutating requests must carry a live token for their session
pub async fn require_csrf_token(
    State(store): State<Arc<dyn TokenStore>>,
    request: Request,
    next: Next,
) -> Result<Response, DeskError> {
    let safe = matches!(
        *request.method(),
        Method::GET | Method::HEAD | Method::OPTIONS
    );
    if safe || request.uri().path() == "/csrf-token" {
        return Ok(next.run(request).await);
    }

    let session = header(request.headers(), SESSION_HEADER);
    let token = header(request.headers(), TOKEN_HEADER);
    let valid = match (session, token) {
        (Some(session), Some(token)) => store.verify(&session, &token).await?,
        _ => false,
    };

    if !valid {
        tracing::warn!(path = %request.uri().path(), "rejected request without a valid CSRF token");
        return Err(RequestError::InvalidCsrfToken.into());
    }
    Ok(next.run(request).await)
}
