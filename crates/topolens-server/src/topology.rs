//! Topology assembler.
//!
//! Composes the static client node, the aggregator's nodes, and the
//! validator's edges into one graph snapshot. Graceful degradation is the
//! contract here: every sub-failure merely shrinks or annotates the graph,
//! it never fails the build.

use tracing::warn;

use topolens_models::{SubsystemNode, TopologyGraph, node_id, structural_edges};

use crate::aggregator::{NodeFetch, fetch_node};
use crate::state::AppState;
use crate::validator;

/// Build one topology snapshot with the given access token.
///
/// Node fetches run concurrently; the emitted node order is deterministic
/// by declaration (client, portalAdaptor, serverAdaptor, portal, server,
/// dataStore) regardless of completion order. The two dynamic edges are
/// probed only when both their endpoint nodes made it into the snapshot.
pub async fn build_snapshot(state: &AppState, token: &str) -> TopologyGraph {
    let enterprise = &state.enterprise;

    // (1) The static client node is always present.
    let mut nodes = vec![SubsystemNode::client()];

    // (2) Fan out the five subsystem fetches; a failed fetch omits its node.
    let (portal_adaptor, server_adaptor, portal, server, data_stores) = tokio::join!(
        fetch_node(enterprise, NodeFetch::PortalAdaptor, token),
        fetch_node(enterprise, NodeFetch::ServerAdaptor, token),
        fetch_node(enterprise, NodeFetch::Portal, token),
        fetch_node(enterprise, NodeFetch::Server, token),
        fetch_node(enterprise, NodeFetch::DataStores, token),
    );
    let outcomes = [
        (NodeFetch::PortalAdaptor, portal_adaptor),
        (NodeFetch::ServerAdaptor, server_adaptor),
        (NodeFetch::Portal, portal),
        (NodeFetch::Server, server),
        (NodeFetch::DataStores, data_stores),
    ];
    for (kind, outcome) in outcomes {
        match outcome {
            Ok(node) => nodes.push(node),
            Err(e) => warn!(kind = ?kind, error = %e, "node fetch failed, omitting from snapshot"),
        }
    }

    // (3) Structural edges exist wherever both endpoints are present.
    let present: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut edges = structural_edges(&present);

    // (4) Probe the two dynamic edges concurrently. The federation probe
    // depends on server metadata, which the joins above have completed.
    let portal_server_present = edges
        .iter()
        .any(|e| e.links(node_id::PORTAL, node_id::SERVER));
    let server_datastore_present = edges
        .iter()
        .any(|e| e.links(node_id::SERVER, node_id::DATA_STORE));

    let (portal_server, server_datastore) = tokio::join!(
        async {
            if portal_server_present {
                Some(validator::validate_portal_server(enterprise, token).await)
            } else {
                None
            }
        },
        async {
            if server_datastore_present {
                validator::validate_server_datastore(enterprise, token).await
            } else {
                None
            }
        },
    );

    for probed in [portal_server, server_datastore].into_iter().flatten() {
        if let Some(slot) = edges
            .iter_mut()
            .find(|e| e.links(&probed.source, &probed.target))
        {
            *slot = probed;
        }
    }

    // (5) Stamp with the current time.
    TopologyGraph::new(nodes, edges)
}
