//! The topology snapshot route.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::extract::AuthSession;
use crate::state::AppState;
use crate::topology::build_snapshot;

/// `GET /topology` — build and return one snapshot.
///
/// Only the extractor can fail here (no valid credential). Everything
/// downstream degrades into a smaller or annotated graph, which is still a
/// successful response: partial visibility beats none for an operator.
pub async fn snapshot(
    State(state): State<Arc<AppState>>,
    auth: AuthSession,
) -> Result<Json<Value>, ApiError> {
    let graph = build_snapshot(&state, auth.token()).await;
    Ok(Json(json!({ "success": true, "data": graph })))
}
