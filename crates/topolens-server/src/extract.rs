//! Authenticated-session extractor.
//!
//! Every route behind authentication declares an [`AuthSession`] argument:
//! the extractor resolves the session cookie, runs the token lifecycle
//! manager, and hands the handler a credential that is guaranteed valid for
//! at least the renewal buffer. A terminal renewal failure destroys the
//! session here, so the client's next request cleanly reports
//! `NotAuthenticated`.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use topolens_models::Credential;

use crate::auth;
use crate::error::ApiError;
use crate::session::{Session, session_id_from_headers};
use crate::state::AppState;

/// An authenticated session with a valid credential.
pub struct AuthSession {
    /// The cookie-derived session id.
    pub session_id: Uuid,
    /// The live session.
    pub session: Arc<Session>,
    /// A credential valid at extraction time.
    pub credential: Credential,
}

impl AuthSession {
    /// The access token to present on outbound admin calls.
    pub fn token(&self) -> &str {
        &self.credential.access_token
    }
}

impl FromRequestParts<Arc<AppState>> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session_id =
            session_id_from_headers(&parts.headers).ok_or(ApiError::NotAuthenticated)?;
        let session = state
            .sessions
            .get(session_id)
            .await
            .ok_or(ApiError::NotAuthenticated)?;

        match auth::ensure_valid(state, &session).await {
            Ok(credential) => Ok(Self {
                session_id,
                session,
                credential,
            }),
            Err(e @ ApiError::AuthRenewalFailed) => {
                // Terminal: the dead session must not linger.
                state.sessions.remove(session_id).await;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}
