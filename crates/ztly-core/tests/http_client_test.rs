#![allow(clippy::unwrap_used)]
// `HttpControllerClient` behind the `ControllerClient` trait object, driven
// against a wiremock controller.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ztly_core::{
    ControllerClient, ControllerConfig, HttpControllerClient, MemoryOwnershipStore,
    NetworkRecord, NetworkService, TlsVerification,
};

// ── Helpers ─────────────────────────────────────────────────────────

const TOKEN: &str = "test-token";
const NET_A: &str = "8056c2e21c000001";
const NET_B: &str = "8056c2e21c000002";
const NODE: &str = "a1b2c3d4e5";

fn config(server: &MockServer) -> ControllerConfig {
    ControllerConfig {
        url: server.uri().parse().unwrap(),
        auth_token: SecretString::from(TOKEN.to_string()),
        tls: TlsVerification::SystemDefaults,
        timeout: Duration::from_secs(5),
        ledger_path: PathBuf::from("unused.json"),
    }
}

fn client(server: &MockServer) -> Arc<dyn ControllerClient> {
    Arc::new(HttpControllerClient::from_config(&config(server)).unwrap())
}

fn network_body(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "nwid": id,
        "name": name,
        "private": true,
        "enableBroadcast": true,
        "multicastLimit": 32,
        "v4AssignMode": { "zt": true },
        "ipAssignmentPools": [],
        "routes": [],
        "revision": 1
    })
}

async fn mount_networks(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/controller/network"))
        .and(header("X-ZT1-Auth", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([NET_A, NET_B])))
        .mount(server)
        .await;
    for (id, name) in [(NET_A, "lab"), (NET_B, "office")] {
        Mock::given(method("GET"))
            .and(path(format!("/controller/network/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(network_body(id, name)))
            .mount(server)
            .await;
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn list_networks_through_trait_object() {
    let server = MockServer::start().await;
    mount_networks(&server).await;

    let mut networks = client(&server).list_networks().await.unwrap();
    networks.sort_by(|a, b| a.id.cmp(&b.id));

    let names: Vec<_> = networks.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, ["lab", "office"]);
    assert!(networks.iter().all(|n| n.config.private));
}

#[tokio::test]
async fn list_members_through_trait_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/controller/network/{NET_A}/member")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ NODE: 2 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/controller/network/{NET_A}/member/{NODE}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": NODE,
            "nwid": NET_A,
            "authorized": true,
            "ipAssignments": ["10.147.17.5"]
        })))
        .mount(&server)
        .await;

    let members = client(&server).list_members(NET_A).await.unwrap();

    assert_eq!(members.len(), 1);
    assert_eq!(members[0].node_id, NODE);
    assert!(members[0].authorized);
    assert_eq!(members[0].ip_assignments.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn service_over_http_runs_on_spawned_tasks() {
    let server = MockServer::start().await;
    mount_networks(&server).await;

    let store = Arc::new(MemoryOwnershipStore::with_records([NetworkRecord::new(
        NET_A, "alice", "lab", "",
    )]));
    let service = NetworkService::new(client(&server), store);

    let detailed = tokio::spawn({
        let service = service.clone();
        async move { service.list_owned_detailed("alice").await }
    })
    .await
    .unwrap()
    .unwrap();
    assert_eq!(detailed.len(), 1);
    assert_eq!(detailed[0].remote.as_ref().unwrap().name, "lab");

    let report = tokio::spawn(async move { service.audit().await })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.untracked, [NET_B.to_string()]);
    assert!(report.orphaned.is_empty());
}
