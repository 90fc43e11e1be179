//! Topology edges.
//!
//! The edge set is a fixed, known list of subsystem-pair relationships; only
//! edge *status* is discovered at runtime. Every edge defaults to
//! [`EdgeStatus::Connected`] until a health probe says otherwise.

use serde::{Deserialize, Serialize};

use crate::node::node_id;

/// Tri-state health of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeStatus {
    /// The pair responded and reported a healthy relationship.
    Connected,
    /// The pair responded but reported diagnostics.
    Warning,
    /// The probe failed at the transport level or raised an error.
    Error,
}

/// One health-annotated edge of the topology snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Current health status.
    pub status: EdgeStatus,
    /// Ordered diagnostic messages from the most recent probe.
    pub messages: Vec<String>,
}

impl Connection {
    /// A structural edge in its default `Connected` state.
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            status: EdgeStatus::Connected,
            messages: Vec::new(),
        }
    }

    /// True when this edge links `source` to `target`.
    pub fn links(&self, source: &str, target: &str) -> bool {
        self.source == source && self.target == target
    }
}

/// Declared subsystem-pair relationships, in emission order.
const DECLARED_EDGES: &[(&str, &str)] = &[
    (node_id::CLIENT, node_id::PORTAL_ADAPTOR),
    (node_id::CLIENT, node_id::SERVER_ADAPTOR),
    (node_id::PORTAL_ADAPTOR, node_id::PORTAL),
    (node_id::SERVER_ADAPTOR, node_id::SERVER),
    (node_id::PORTAL, node_id::SERVER),
    (node_id::SERVER, node_id::DATA_STORE),
];

/// Build the structural edges for the nodes present in a snapshot.
///
/// An edge is emitted exactly once per declared relationship, and only when
/// both endpoint nodes are present.
pub fn structural_edges(present_node_ids: &[&str]) -> Vec<Connection> {
    DECLARED_EDGES
        .iter()
        .filter(|(source, target)| {
            present_node_ids.contains(source) && present_node_ids.contains(target)
        })
        .map(|(source, target)| Connection::new(source, target))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_node_set_yields_all_edges() {
        let edges = structural_edges(&[
            node_id::CLIENT,
            node_id::PORTAL_ADAPTOR,
            node_id::SERVER_ADAPTOR,
            node_id::PORTAL,
            node_id::SERVER,
            node_id::DATA_STORE,
        ]);
        assert_eq!(edges.len(), 6);
        assert!(edges.iter().all(|e| e.status == EdgeStatus::Connected));
        assert!(edges.iter().all(|e| e.messages.is_empty()));
    }

    #[test]
    fn missing_node_drops_its_edges() {
        // No server node: serverAdaptor→server, portal→server and
        // server→dataStore all disappear.
        let edges = structural_edges(&[
            node_id::CLIENT,
            node_id::PORTAL_ADAPTOR,
            node_id::SERVER_ADAPTOR,
            node_id::PORTAL,
            node_id::DATA_STORE,
        ]);
        assert_eq!(edges.len(), 3);
        assert!(edges.iter().any(|e| e.links(node_id::CLIENT, node_id::PORTAL_ADAPTOR)));
        assert!(edges.iter().any(|e| e.links(node_id::CLIENT, node_id::SERVER_ADAPTOR)));
        assert!(edges.iter().any(|e| e.links(node_id::PORTAL_ADAPTOR, node_id::PORTAL)));
    }

    #[test]
    fn client_only_yields_no_edges() {
        assert!(structural_edges(&[node_id::CLIENT]).is_empty());
    }

    #[test]
    fn edge_status_wire_format() {
        let mut edge = Connection::new(node_id::PORTAL, node_id::SERVER);
        edge.status = EdgeStatus::Warning;
        edge.messages.push("cert mismatch".into());
        let wire = serde_json::to_value(&edge).unwrap();
        assert_eq!(wire["status"], "warning");
        assert_eq!(wire["messages"][0], "cert mismatch");
    }
}
