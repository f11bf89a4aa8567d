#![allow(clippy::unwrap_used)]
// Integration tests for `RoseClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rose_api::{Error, RoseClient, StatusResponse};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RoseClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = RoseClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

// ── Status tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_status_without_display() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rose/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "decay": 12,
            "max_decay": 20,
            "battery": 87
        })))
        .expect(1)
        .mount(&server)
        .await;

    let status = client.status().await.unwrap();

    assert_eq!(
        status,
        StatusResponse {
            decay: 12,
            max_decay: 20,
            battery: 87,
            display: None,
        }
    );
}

#[tokio::test]
async fn test_status_with_display() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rose/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "decay": 0,
            "max_decay": 20,
            "battery": 100,
            "display": true
        })))
        .mount(&server)
        .await;

    let status = client.status().await.unwrap();
    assert_eq!(status.display, Some(true));
}

#[tokio::test]
async fn test_status_custom_path() {
    let (server, client) = setup().await;
    let client = client.with_status_path("/api/status");

    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "decay": 1, "max_decay": 14, "battery": 50
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.status().await.unwrap().decay, 1);
}

#[tokio::test]
async fn test_status_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rose/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"decay": 4}"#))
        .mount(&server)
        .await;

    let result = client.status().await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert_eq!(body, r#"{"decay": 4}"#),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_status_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rose/data"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.status().await.unwrap_err();
    assert!(matches!(err, Error::Http { status: 503, .. }), "got: {err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_status_connection_refused() {
    // Bind then drop a listener so the port is closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let base_url = Url::parse(&format!("http://{addr}")).unwrap();

    let client = RoseClient::with_client(reqwest::Client::new(), base_url);
    let err = client.status().await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
}

// ── Action tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_send_action_ignores_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rose/decay"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .expect(1)
        .mount(&server)
        .await;

    client.send_action("/rose/decay").await.unwrap();
}

#[tokio::test]
async fn test_send_action_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rose/unknown"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let err = client.send_action("/rose/unknown").await.unwrap_err();
    assert!(err.is_not_found(), "got: {err:?}");
}
