//! Connection-health validator.
//!
//! Issues targeted probes for the two dynamic subsystem-pair relationships
//! and derives a tri-state edge status. Probe failures are confined to the
//! edge being validated: any error is mapped to `Error` on that specific
//! connection with the message captured as a diagnostic, and never aborts
//! validation of other pairs.

use serde_json::Value;
use tracing::debug;

use topolens_client::{ClientError, FederationValidation};
use topolens_models::{Connection, DataStoreItem, EdgeStatus, StoreType, node_id};

use crate::enterprise::Enterprise;

/// Probe the portal↔server federation and derive the `portal→server` edge.
///
/// Non-2xx ⇒ `Error`; 2xx with `status = "failure"` ⇒ `Warning` carrying the
/// body's messages; 2xx with `status = "success"` ⇒ `Connected`.
pub async fn validate_portal_server(enterprise: &Enterprise, token: &str) -> Connection {
    let mut edge = Connection::new(node_id::PORTAL, node_id::SERVER);
    match probe_federation(enterprise, token).await {
        Ok(validation) if validation.is_success() => {
            edge.status = EdgeStatus::Connected;
            edge.messages.clear();
        }
        Ok(validation) => {
            edge.status = EdgeStatus::Warning;
            edge.messages = validation.messages;
        }
        Err(e) => {
            edge.status = EdgeStatus::Error;
            edge.messages = vec![e.to_string()];
        }
    }
    debug!(status = ?edge.status, "portal↔server federation probed");
    edge
}

async fn probe_federation(
    enterprise: &Enterprise,
    token: &str,
) -> Result<FederationValidation, ClientError> {
    let client = enterprise.portal_client().await;
    let servers = client.federation_servers(token).await?;
    let server_url = enterprise.server_meta().await.url;

    // Prefer the entry registered under our server's URL; a single-server
    // deployment falls back to the first entry.
    let federated = servers
        .iter()
        .find(|s| s.url.as_deref() == Some(server_url.as_str()))
        .or_else(|| servers.first())
        .ok_or_else(|| ClientError::Malformed("no federated servers registered".into()))?;

    client.validate_federation(&federated.id, token).await
}

/// Probe the server↔dataStore relationship via one representative
/// raster-store item.
///
/// Returns `None` when no raster-store item is cached: the probe cannot
/// run and the edge keeps its prior (default) status.
pub async fn validate_server_datastore(enterprise: &Enterprise, token: &str) -> Option<Connection> {
    let item = enterprise
        .data_stores()
        .await
        .into_iter()
        .find(|item| item.store_type == StoreType::RasterStore)?;

    let mut edge = Connection::new(node_id::SERVER, node_id::DATA_STORE);
    match enterprise
        .server_client()
        .await
        .validate_data_item(token, &raw_item(&item))
        .await
    {
        Ok(validation) => match validation.first_error() {
            Some((machine, messages)) => {
                debug!(%machine, "data item reported an error condition");
                edge.status = EdgeStatus::Warning;
                edge.messages = messages;
            }
            None => {
                edge.status = EdgeStatus::Connected;
            }
        },
        Err(e) => {
            edge.status = EdgeStatus::Error;
            edge.messages = vec![e.to_string()];
        }
    }
    Some(edge)
}

/// Rebuild the provider payload the server expects, without our tag.
fn raw_item(item: &DataStoreItem) -> Value {
    let mut value = serde_json::to_value(item).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.remove("storeType");
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_item_drops_the_store_type_tag() {
        let item = DataStoreItem::from_raw(
            json!({ "id": "r1", "path": "/rasterStores/r1", "type": "rasterStore" }),
            StoreType::RasterStore,
        )
        .unwrap();
        let raw = raw_item(&item);
        assert!(raw.get("storeType").is_none());
        assert_eq!(raw["id"], "r1");
        assert_eq!(raw["type"], "rasterStore");
    }
}
