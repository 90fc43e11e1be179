//! Server proxy routes: health check, cached meta info, log query.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use serde_json::{Value, json};

use topolens_models::{LogPage, paginate};

use crate::error::ApiError;
use crate::extract::AuthSession;
use crate::routes::LogsQuery;
use crate::state::AppState;

/// `GET /server/healthCheck` — forwarded to the server, polled by the UI.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
    _auth: AuthSession,
) -> Result<Json<Value>, ApiError> {
    let data = state.enterprise.server_client().await.health_check().await?;
    Ok(Json(json!({ "success": true, "data": data })))
}

/// `GET /server/metaInfo` — cached server metadata from the enterprise
/// context.
pub async fn meta_info(
    State(state): State<Arc<AppState>>,
    _auth: AuthSession,
) -> Json<Value> {
    let meta = state.enterprise.server_meta().await;
    Json(json!({ "success": true, "data": meta }))
}

/// `GET /server/logs` — query server logs, filter by level, paginate.
pub async fn logs(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogPage>, ApiError> {
    let records = state
        .enterprise
        .server_client()
        .await
        .query_logs(
            auth.token(),
            query.level.as_deref(),
            query.start_time.as_deref(),
            query.end_time.as_deref(),
        )
        .await?;
    Ok(Json(paginate(
        records,
        query.level.as_deref(),
        query.page(),
        query.page_size(),
    )))
}
