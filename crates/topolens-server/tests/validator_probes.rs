//! Tri-state edge derivation from the connection-health probes.

mod common;

use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use topolens_models::{node_id, EdgeStatus};
use topolens_server::aggregator::{self, NodeFetch};
use topolens_server::validator;

use common::test_state;

const FEDERATION_SERVERS: &str = "/portal/portaladmin/federation/servers";

async fn mount_federation_list(upstream: &MockServer) {
    Mock::given(method("GET"))
        .and(path(FEDERATION_SERVERS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "servers": [{ "id": "fed-1", "url": format!("{}/server", upstream.uri()) }]
        })))
        .mount(upstream)
        .await;
}

#[tokio::test]
async fn healthy_federation_yields_connected() {
    let upstream = MockServer::start().await;
    mount_federation_list(&upstream).await;
    Mock::given(method("GET"))
        .and(path(format!("{FEDERATION_SERVERS}/fed-1/validate")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": "success" })),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let state = test_state(&upstream.uri()).await;
    let edge = validator::validate_portal_server(&state.enterprise, "tok").await;
    assert!(edge.links(node_id::PORTAL, node_id::SERVER));
    assert_eq!(edge.status, EdgeStatus::Connected);
    assert!(edge.messages.is_empty());
}

#[tokio::test]
async fn rejected_federation_yields_warning_with_diagnostics() {
    let upstream = MockServer::start().await;
    mount_federation_list(&upstream).await;
    Mock::given(method("GET"))
        .and(path(format!("{FEDERATION_SERVERS}/fed-1/validate")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "failure",
            "messages": ["cert mismatch", "clock skew"],
        })))
        .mount(&upstream)
        .await;

    let state = test_state(&upstream.uri()).await;
    let edge = validator::validate_portal_server(&state.enterprise, "tok").await;
    assert_eq!(edge.status, EdgeStatus::Warning);
    assert_eq!(edge.messages, vec!["cert mismatch", "clock skew"]);
}

#[tokio::test]
async fn unreachable_probe_yields_error() {
    let upstream = MockServer::start().await;
    mount_federation_list(&upstream).await;
    Mock::given(method("GET"))
        .and(path_regex(r"/validate$"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstream)
        .await;

    let state = test_state(&upstream.uri()).await;
    let edge = validator::validate_portal_server(&state.enterprise, "tok").await;
    assert_eq!(edge.status, EdgeStatus::Error);
    assert_eq!(edge.messages.len(), 1);
}

#[tokio::test]
async fn datastore_probe_is_skipped_without_a_raster_item() {
    let upstream = MockServer::start().await;
    // Every store query comes back empty, so nothing is cached.
    Mock::given(method("POST"))
        .and(path("/server/admin/data/findItems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/server/admin/data/validateDataItem"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let state = test_state(&upstream.uri()).await;
    aggregator::fetch_node(&state.enterprise, NodeFetch::DataStores, "tok")
        .await
        .unwrap();

    let edge = validator::validate_server_datastore(&state.enterprise, "tok").await;
    assert!(edge.is_none());
}

#[tokio::test]
async fn datastore_probe_reports_machine_diagnostics_as_warning() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/server/admin/data/findItems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": "r1", "path": "/rasterStores/r1", "type": "rasterStore" }]
        })))
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/server/admin/data/validateDataItem"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "machines": [{
                "machine": "GIS-1",
                "dataItems": [{ "status": "error", "messages": ["path unreachable"] }]
            }]
        })))
        .mount(&upstream)
        .await;

    let state = test_state(&upstream.uri()).await;
    aggregator::fetch_node(&state.enterprise, NodeFetch::DataStores, "tok")
        .await
        .unwrap();

    let edge = validator::validate_server_datastore(&state.enterprise, "tok")
        .await
        .unwrap();
    assert!(edge.links(node_id::SERVER, node_id::DATA_STORE));
    assert_eq!(edge.status, EdgeStatus::Warning);
    assert_eq!(edge.messages, vec!["path unreachable"]);
}
