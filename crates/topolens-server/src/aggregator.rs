//! Enterprise metadata aggregator.
//!
//! Fan-out caller that builds one topology node per subsystem kind,
//! updating the enterprise caches as a side effect. The data-store
//! collection is assembled from six independent sub-fetches issued
//! concurrently; each sub-fetch's outcome is isolated, so a failing store
//! kind contributes zero items and never aborts the other five.

use futures::future::join_all;
use strum::IntoEnumIterator;
use tracing::{debug, warn};

use topolens_client::{ClientError, ComponentVersion, WebAdaptorEntry};
use topolens_models::{
    ComponentInfo, DataStoreItem, StoreType, SubsystemNode, WebAdaptorInfo, node_id,
};

use crate::enterprise::Enterprise;

/// The subsystem kinds the aggregator can fetch a node for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFetch {
    /// The portal component.
    Portal,
    /// The compute server component.
    Server,
    /// The portal-facing web adaptor.
    PortalAdaptor,
    /// The server-facing web adaptor.
    ServerAdaptor,
    /// The aggregated data-store collection.
    DataStores,
}

/// Fetch metadata for one subsystem kind and build its topology node.
///
/// A failure means "omit this node from the snapshot"; the caller decides,
/// this function never aborts a wider pipeline.
pub async fn fetch_node(
    enterprise: &Enterprise,
    kind: NodeFetch,
    token: &str,
) -> Result<SubsystemNode, ClientError> {
    match kind {
        NodeFetch::Portal => fetch_portal(enterprise, token).await,
        NodeFetch::Server => fetch_server(enterprise, token).await,
        NodeFetch::PortalAdaptor => fetch_portal_adaptor(enterprise, token).await,
        NodeFetch::ServerAdaptor => fetch_server_adaptor(enterprise, token).await,
        NodeFetch::DataStores => Ok(fetch_data_stores(enterprise, token).await),
    }
}

/// Refresh every cache with a freshly issued token.
///
/// Used right after the code exchange. Best-effort: failures are logged and
/// degrade the caches, nothing propagates.
pub async fn refresh_all(enterprise: &Enterprise, token: &str) {
    let kinds = [
        NodeFetch::PortalAdaptor,
        NodeFetch::ServerAdaptor,
        NodeFetch::Portal,
        NodeFetch::Server,
        NodeFetch::DataStores,
    ];
    let results = join_all(kinds.iter().map(|kind| fetch_node(enterprise, *kind, token))).await;
    for (kind, result) in kinds.iter().zip(results) {
        if let Err(e) = result {
            warn!(kind = ?kind, error = %e, "metadata refresh fetch failed");
        }
    }
}

async fn fetch_portal(enterprise: &Enterprise, token: &str) -> Result<SubsystemNode, ClientError> {
    let version = enterprise.portal_client().await.info(token).await?;
    enterprise
        .set_portal_version(version.version.clone(), version.build.clone())
        .await;
    Ok(SubsystemNode::portal(component_info(
        enterprise.portal_url().await,
        version,
    )))
}

async fn fetch_server(enterprise: &Enterprise, token: &str) -> Result<SubsystemNode, ClientError> {
    let client = enterprise.server_client().await;
    let version = client.info(token).await?;
    enterprise
        .set_server_version(version.version.clone(), version.build.clone())
        .await;
    let url = enterprise.server_meta().await.url;
    Ok(SubsystemNode::server(component_info(url, version)))
}

async fn fetch_portal_adaptor(
    enterprise: &Enterprise,
    token: &str,
) -> Result<SubsystemNode, ClientError> {
    let adaptors = enterprise.portal_client().await.web_adaptors(token).await?;
    let info = adaptor_info(adaptors)?;
    enterprise.set_portal_adaptor(info.clone()).await;
    Ok(SubsystemNode::web_adaptor(
        node_id::PORTAL_ADAPTOR,
        "Portal Web Adaptor",
        "portal_webAdaptor",
        info,
    ))
}

async fn fetch_server_adaptor(
    enterprise: &Enterprise,
    token: &str,
) -> Result<SubsystemNode, ClientError> {
    let adaptors = enterprise.server_client().await.web_adaptors(token).await?;
    let info = adaptor_info(adaptors)?;
    enterprise.set_server_adaptor(info.clone()).await;
    Ok(SubsystemNode::web_adaptor(
        node_id::SERVER_ADAPTOR,
        "Server Web Adaptor",
        "server_webAdaptor",
        info,
    ))
}

/// Aggregate the six data-store sub-fetches into one collection node.
///
/// Partial-failure tolerant by construction: the sub-fetches run
/// concurrently and are collected individually, so 0 to 5 failures still
/// yield the union of the successful stores' items.
async fn fetch_data_stores(enterprise: &Enterprise, token: &str) -> SubsystemNode {
    let client = enterprise.server_client().await;
    let stores: Vec<StoreType> = StoreType::iter().collect();
    let results = join_all(
        stores
            .iter()
            .map(|store| client.find_items(token, *store)),
    )
    .await;

    let mut items: Vec<DataStoreItem> = Vec::new();
    for (store, result) in stores.iter().zip(results) {
        match result {
            Ok(raw_items) => {
                debug!(store = %store, count = raw_items.len(), "data-store sub-fetch succeeded");
                items.extend(
                    raw_items
                        .into_iter()
                        .filter_map(|raw| DataStoreItem::from_raw(raw, *store)),
                );
            }
            Err(e) => {
                warn!(store = %store, error = %e, "data-store sub-fetch failed, skipping this store type");
            }
        }
    }

    enterprise.set_data_stores(items.clone()).await;
    SubsystemNode::data_store(items)
}

fn component_info(url: String, version: ComponentVersion) -> ComponentInfo {
    ComponentInfo {
        url,
        version: version.version,
        build: version.build,
    }
}

fn adaptor_info(adaptors: Vec<WebAdaptorEntry>) -> Result<WebAdaptorInfo, ClientError> {
    let entry = adaptors
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::Malformed("no web adaptors registered".into()))?;
    Ok(WebAdaptorInfo {
        name: entry.machine_name,
        ip: entry.machine_ip,
        url: entry.web_adaptor_url,
        id: entry.id,
        http_port: entry.http_port,
        https_port: entry.https_port,
    })
}
