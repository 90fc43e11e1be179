//! Token lifecycle manager.
//!
//! Owns the renewal policy for the session-bound credential: proactive
//! renewal inside a 5-minute buffer before expiry, one-time
//! authorization-code exchange, and invalidation. Renewal is fail-closed: a
//! rejected refresh clears the credential so the next call surfaces
//! `NotAuthenticated` instead of retrying with a dead token.

use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use topolens_client::TokenGrant;
use topolens_models::Credential;

use crate::aggregator;
use crate::error::ApiError;
use crate::session::Session;
use crate::state::AppState;

/// How long before expiry a credential is renewed.
pub fn renewal_buffer() -> Duration {
    Duration::minutes(5)
}

/// Return a valid credential for the session, renewing it first when it is
/// inside the renewal buffer.
///
/// Holds the session's credential lock for the whole check-and-renew, so
/// concurrent requests on one session perform at most one refresh exchange.
pub async fn ensure_valid(state: &AppState, session: &Session) -> Result<Credential, ApiError> {
    let mut slot = session.credential.lock().await;

    let current = match slot.as_ref() {
        Some(cred) if cred.is_authenticated() => cred.clone(),
        _ => return Err(ApiError::NotAuthenticated),
    };

    if !current.expires_within(renewal_buffer()) {
        return Ok(current);
    }

    info!(owner = %current.owner, "access token near expiry, renewing");
    match state.token_client().await.refresh(&current.refresh_token).await {
        Ok(grant) => {
            let renewed = credential_from_grant(&grant, &current)?;
            info!(
                owner = %renewed.owner,
                expires_at = %renewed.expires_at,
                "access token renewed"
            );
            *slot = Some(renewed.clone());
            Ok(renewed)
        }
        Err(e) => {
            // Fail closed: a stale token must never be handed back.
            warn!(owner = %current.owner, error = %e, "token renewal failed, invalidating credential");
            *slot = None;
            Err(ApiError::AuthRenewalFailed)
        }
    }
}

fn credential_from_grant(grant: &TokenGrant, prior: &Credential) -> Result<Credential, ApiError> {
    let now = Utc::now();
    let refresh_token = grant
        .refresh_token
        .clone()
        // Rotation is optional: keep the prior refresh token when the
        // exchange response omits a new one.
        .unwrap_or_else(|| prior.refresh_token.clone());
    let refresh_expires_at = grant
        .refresh_token_expires_in
        .map(|secs| now + Duration::seconds(secs))
        .unwrap_or(prior.refresh_expires_at);

    Credential::new(
        grant.access_token.clone(),
        refresh_token,
        now,
        now + Duration::seconds(grant.expires_in),
        refresh_expires_at,
        prior.owner.clone(),
    )
    .map_err(|e| ApiError::Upstream(topolens_client::ClientError::Malformed(e.to_string())))
}

/// One-time exchange of an authorization code for an initial credential.
///
/// On success a fresh session is created and a full metadata refresh is
/// kicked off with the new access token (best-effort: individual fetch
/// failures degrade the caches, not the login). Upstream rejections pass
/// their status code and message through unchanged.
pub async fn exchange_code(state: &AppState, code: &str) -> Result<(Uuid, Credential), ApiError> {
    let grant = state
        .token_client()
        .await
        .exchange_code(code, &state.config.redirect_uri)
        .await?;

    let now = Utc::now();
    let credential = Credential::new(
        grant.access_token.clone(),
        grant.refresh_token.clone().unwrap_or_default(),
        now,
        now + Duration::seconds(grant.expires_in),
        grant
            .refresh_token_expires_in
            .map(|secs| now + Duration::seconds(secs))
            .unwrap_or(now),
        grant.username.clone().unwrap_or_default(),
    )
    .map_err(|e| ApiError::Upstream(topolens_client::ClientError::Malformed(e.to_string())))?;

    let (session_id, session) = state.sessions.create().await;
    *session.credential.lock().await = Some(credential.clone());
    info!(owner = %credential.owner, "authorization code exchanged, session created");

    aggregator::refresh_all(&state.enterprise, &credential.access_token).await;

    Ok((session_id, credential))
}

/// Destroy a session and everything derived from it. Idempotent.
pub async fn revoke(state: &AppState, session_id: Uuid) {
    if state.sessions.remove(session_id).await {
        info!(%session_id, "session revoked");
    }
}
