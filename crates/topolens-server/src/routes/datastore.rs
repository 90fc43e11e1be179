//! Data-store listing routes, served from the enterprise cache.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::extract::AuthSession;
use crate::state::AppState;

/// `GET /dataStore/all` — cached data-store items, raw payloads included.
pub async fn all(State(state): State<Arc<AppState>>, _auth: AuthSession) -> Json<Value> {
    let items = state.enterprise.data_stores().await;
    Json(json!({ "success": true, "data": items }))
}

/// `GET /dataStore/metaInfo` — `{id, path, type}` projection per item.
pub async fn meta_info(State(state): State<Arc<AppState>>, _auth: AuthSession) -> Json<Value> {
    let items = state.enterprise.data_stores().await;
    let meta: Vec<Value> = items
        .iter()
        .map(|item| {
            json!({
                "id": item.id,
                "path": item.path,
                "type": item.extra.get("type").cloned().unwrap_or(Value::Null),
            })
        })
        .collect();
    Json(json!({ "success": true, "data": meta }))
}
