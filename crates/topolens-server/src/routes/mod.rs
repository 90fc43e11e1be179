//! HTTP surface of the backend.
//!
//! The route set mirrors what the polling UI consumes: the oauth pair, the
//! topology snapshot, per-subsystem health/meta/log endpoints, and the
//! data-store listings. Everything except the oauth pair requires an
//! authenticated session.

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::http::header::CACHE_CONTROL;
use axum::middleware::map_response;
use axum::response::Response;
use axum::routing::{get, post};
use serde::Deserialize;

use crate::state::AppState;

pub mod datastore;
pub mod oauth;
pub mod portal;
pub mod server;
pub mod topology;

/// Shared query parameters of the two log endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsQuery {
    /// Exact severity level to keep; absent keeps everything.
    pub level: Option<String>,
    /// 1-based page number (default 1).
    pub page: Option<usize>,
    /// Page size (default 10).
    pub page_size: Option<usize>,
    /// Inclusive range start, forwarded upstream verbatim.
    pub start_time: Option<String>,
    /// Inclusive range end, forwarded upstream verbatim.
    pub end_time: Option<String>,
}

impl LogsQuery {
    pub(crate) fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }

    pub(crate) fn page_size(&self) -> usize {
        self.page_size.unwrap_or(10)
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/oauth/exchange", post(oauth::exchange))
        .route("/oauth/signout", post(oauth::signout))
        .route("/topology", get(topology::snapshot))
        .route("/portal/healthCheck", get(portal::health_check))
        .route("/portal/metaInfo", get(portal::meta_info))
        .route("/portal/logs", get(portal::logs))
        .route("/server/healthCheck", get(server::health_check))
        .route("/server/metaInfo", get(server::meta_info))
        .route("/server/logs", get(server::logs))
        .route("/dataStore/all", get(datastore::all))
        .route("/dataStore/metaInfo", get(datastore::meta_info))
        // The UI polls aggressively; never let intermediaries cache.
        .layer(map_response(no_store))
        .with_state(state)
}

async fn no_store(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
