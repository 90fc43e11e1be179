//! API error types.
//!
//! [`ApiError`] unifies all failure modes and implements
//! [`axum::response::IntoResponse`] so handlers can return
//! `Result<…, ApiError>` directly.
//!
//! Propagation policy: the two auth variants are 401-equivalent and destroy
//! the session; upstream failures only reach here from contexts with no
//! degradation path (the oauth exchange, the healthCheck/log proxies) —
//! node-metadata and edge-probe failures are absorbed before this layer.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use topolens_client::ClientError;

/// Errors that can surface from a request handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The session has no credential.
    #[error("Not Authenticated")]
    NotAuthenticated,

    /// A refresh-token exchange was rejected. Terminal: forces re-login.
    #[error("Session expired, please login again")]
    AuthRenewalFailed,

    /// The request was malformed (e.g. missing authorization code).
    #[error("{0}")]
    BadRequest(String),

    /// An upstream subsystem call failed in a context with no degradation
    /// path. `Rejected` keeps the upstream status code on the way out.
    #[error(transparent)]
    Upstream(#[from] ClientError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotAuthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::AuthRenewalFailed => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::Upstream(ClientError::Rejected { status, message }) => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                message.clone(),
            ),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        tracing::error!(%status, error = %message, "request failed");
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_are_unauthorized() {
        let res = ApiError::NotAuthenticated.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let res = ApiError::AuthRenewalFailed.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn rejected_upstream_status_passes_through() {
        let err = ApiError::Upstream(ClientError::Rejected {
            status: 403,
            message: "token invalid".into(),
        });
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn malformed_upstream_is_bad_gateway() {
        let err = ApiError::Upstream(ClientError::Malformed("no items".into()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
