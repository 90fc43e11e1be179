//! The per-request topology snapshot.

use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::edge::Connection;
use crate::node::SubsystemNode;

/// One point-in-time graph of nodes and health-annotated edges.
///
/// Ephemeral: constructed per request, never cached across requests, safe to
/// discard immediately after serialisation. Node order is deterministic by
/// declaration order, independent of fetch completion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyGraph {
    /// Ordered nodes (client, portalAdaptor, serverAdaptor, portal, server,
    /// dataStore — minus any whose fetch failed).
    pub nodes: Vec<SubsystemNode>,
    /// Ordered edges, one per declared relationship with both ends present.
    pub edges: Vec<Connection>,
    /// Snapshot time, serialised as epoch milliseconds.
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl TopologyGraph {
    /// Stamp a snapshot with the current time.
    pub fn new(nodes: Vec<SubsystemNode>, edges: Vec<Connection>) -> Self {
        Self {
            nodes,
            edges,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_serialises_as_epoch_millis() {
        let graph = TopologyGraph::new(vec![SubsystemNode::client()], Vec::new());
        let wire = serde_json::to_value(&graph).unwrap();
        assert!(wire["timestamp"].is_i64());
        assert!(wire["timestamp"].as_i64().unwrap() > 1_500_000_000_000);
    }

    #[test]
    fn snapshot_time_is_between_start_and_now() {
        let start = Utc::now();
        let graph = TopologyGraph::new(Vec::new(), Vec::new());
        assert!(graph.timestamp >= start);
        assert!(graph.timestamp <= Utc::now());
    }
}
