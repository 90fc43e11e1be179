//! Topology nodes.
//!
//! A [`SubsystemNode`] is created fresh on every topology pass; its identity
//! is purely its `id` within one snapshot. The declared node set is fixed:
//! the static client, the two web adaptors, the portal, the server, and the
//! aggregated data-store collection.

use serde::{Deserialize, Serialize};

use crate::datastore::DataStoreItem;

/// Stable node ids used within a snapshot.
pub mod node_id {
    /// The static client node.
    pub const CLIENT: &str = "client";
    /// The portal-facing web adaptor.
    pub const PORTAL_ADAPTOR: &str = "portalAdaptor";
    /// The server-facing web adaptor.
    pub const SERVER_ADAPTOR: &str = "serverAdaptor";
    /// The portal component.
    pub const PORTAL: &str = "portal";
    /// The compute server component.
    pub const SERVER: &str = "server";
    /// The aggregated data-store collection.
    pub const DATA_STORE: &str = "dataStore";
}

/// Variant tag of a [`SubsystemNode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// The pre-declared client node (no backing subsystem).
    Static,
    /// A front-facing web adaptor.
    WebAdaptor,
    /// The portal component.
    Portal,
    /// The compute server component.
    Server,
    /// The data-store collection.
    DataStore,
}

/// Coarse health tag attached to some nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeStatus {
    /// Subsystem metadata was fetched successfully.
    Healthy,
    /// Subsystem responded with diagnostics.
    Warning,
    /// Subsystem could not be reached or rejected the request.
    Error,
}

/// Version/build/location projection for the portal or server component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    /// Externally-reachable URL of the component.
    pub url: String,
    /// Reported product version.
    pub version: Option<String>,
    /// Reported build number.
    pub build: Option<String>,
}

/// Projection of one web-adaptor registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebAdaptorInfo {
    /// Machine name the adaptor runs on.
    pub name: String,
    /// Machine IP address.
    pub ip: String,
    /// Externally-reachable URL registered for the adaptor.
    pub url: String,
    /// Stable adaptor id.
    pub id: String,
    /// HTTP port.
    pub http_port: u16,
    /// HTTPS port.
    pub https_port: u16,
}

/// Subsystem-specific metadata attached to a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeInfo {
    /// Web-adaptor registration details.
    WebAdaptor(WebAdaptorInfo),
    /// Portal/server version and location.
    Component(ComponentInfo),
    /// Tagged data-store items, concatenated across store types.
    DataStores(Vec<DataStoreItem>),
}

/// One node of the topology snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsystemNode {
    /// Stable id within the snapshot (see [`node_id`]).
    pub id: String,
    /// Variant tag.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Human-readable label.
    pub label: String,
    /// Icon tag consumed by the UI.
    pub icon: String,
    /// Subsystem-specific metadata, when the fetch succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<NodeInfo>,
    /// Coarse health tag, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
}

impl SubsystemNode {
    /// The static client node emitted at the head of every snapshot.
    pub fn client() -> Self {
        Self {
            id: node_id::CLIENT.into(),
            kind: NodeKind::Static,
            label: "User Client".into(),
            icon: "client".into(),
            info: None,
            status: None,
        }
    }

    /// A web-adaptor node.
    pub fn web_adaptor(id: &str, label: &str, icon: &str, info: WebAdaptorInfo) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::WebAdaptor,
            label: label.into(),
            icon: icon.into(),
            info: Some(NodeInfo::WebAdaptor(info)),
            status: Some(NodeStatus::Healthy),
        }
    }

    /// The portal component node.
    pub fn portal(info: ComponentInfo) -> Self {
        Self {
            id: node_id::PORTAL.into(),
            kind: NodeKind::Portal,
            label: "Portal".into(),
            icon: "portal".into(),
            info: Some(NodeInfo::Component(info)),
            status: None,
        }
    }

    /// The compute server node.
    pub fn server(info: ComponentInfo) -> Self {
        Self {
            id: node_id::SERVER.into(),
            kind: NodeKind::Server,
            label: "Server".into(),
            icon: "server".into(),
            info: Some(NodeInfo::Component(info)),
            status: None,
        }
    }

    /// The aggregated data-store collection node.
    pub fn data_store(items: Vec<DataStoreItem>) -> Self {
        Self {
            id: node_id::DATA_STORE.into(),
            kind: NodeKind::DataStore,
            label: "Data Store".into(),
            icon: "dataStore".into(),
            info: Some(NodeInfo::DataStores(items)),
            status: Some(NodeStatus::Healthy),
        }
    }
}
