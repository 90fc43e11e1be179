//! Cookie-keyed in-memory session store.
//!
//! One session per signed-in UI client, created on a successful code
//! exchange and destroyed on signout or terminal auth failure. The
//! credential slot sits behind a tokio [`Mutex`]: concurrent requests from
//! the same session that both trigger renewal are serialized on it, so two
//! refresh-token exchanges can never race and invalidate each other.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{HeaderMap, header::COOKIE};
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use topolens_models::Credential;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "topolens.sid";

/// Server-side state for one signed-in client.
#[derive(Debug, Default)]
pub struct Session {
    /// The session's credential; `None` means unauthenticated.
    pub credential: Mutex<Option<Credential>>,
}

/// Process-wide registry of live sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Arc<Session>>>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh session with a random id.
    ///
    /// Doubles as the eviction point: every login sweeps sessions whose
    /// refresh token has expired, so abandoned logins cannot accumulate.
    pub async fn create(&self) -> (Uuid, Arc<Session>) {
        self.evict_expired().await;
        let id = Uuid::new_v4();
        let session = Arc::new(Session::default());
        self.inner.write().await.insert(id, session.clone());
        (id, session)
    }

    /// Drop sessions that can never renew again.
    ///
    /// A contended credential lock means the session is mid-request; skip
    /// it, the next sweep will catch it. Sessions whose credential is not
    /// yet installed are kept: their exchange is still in flight.
    async fn evict_expired(&self) {
        let now = Utc::now();
        self.inner.write().await.retain(|_, session| {
            match session.credential.try_lock() {
                Ok(slot) => match slot.as_ref() {
                    Some(cred) => cred.refresh_expires_at > now,
                    None => true,
                },
                Err(_) => true,
            }
        });
    }

    /// Look up a session by id.
    pub async fn get(&self, id: Uuid) -> Option<Arc<Session>> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Destroy a session. Idempotent.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }
}

/// Extract the session id from a request's `Cookie` headers.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else { continue };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            if parts.next() == Some(SESSION_COOKIE) {
                if let Some(id) = parts.next().and_then(|v| Uuid::parse_str(v).ok()) {
                    return Some(id);
                }
            }
        }
    }
    None
}

/// `Set-Cookie` value installing a session cookie.
pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value clearing the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
