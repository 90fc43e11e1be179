//! OAuth code exchange and signout.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::auth;
use crate::error::ApiError;
use crate::session::{clear_session_cookie, session_cookie, session_id_from_headers};
use crate::state::AppState;

/// Body of `POST /oauth/exchange`.
#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
    /// Authorization code received from the portal's OAuth redirect.
    pub code: Option<String>,
}

/// `POST /oauth/exchange` — exchange an authorization code for a session.
pub async fn exchange(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExchangeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let code = req
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing authorization code".into()))?;

    let (session_id, credential) = auth::exchange_code(&state, &code).await?;

    let cookie = session_cookie(session_id);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(json!({
            "success": true,
            "username": credential.owner,
            "expiresAt": credential.expires_at.timestamp_millis(),
        })),
    ))
}

/// `POST /oauth/signout` — destroy the session. Idempotent.
pub async fn signout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(session_id) = session_id_from_headers(&headers) {
        auth::revoke(&state, session_id).await;
    }
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Json(json!({ "success": true })),
    )
}
