//! HTTP clients against a mock API

use leadbook_client::{ClientConfig, HttpLeadStore, MessageClient};
use leadbook_compose::{GenerateError, MessageGenerator, MessageRequest};
use leadbook_store::{LeadStore, StoreError, StoreErrorKind};
use leadbook_test_utils::sample_leads;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(server.uri()).with_timeout(Duration::from_secs(2))
}

#[tokio::test]
async fn fetch_decodes_leads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/leads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_leads()))
        .mount(&server)
        .await;

    let store = HttpLeadStore::new(&config_for(&server)).unwrap();
    assert_eq!(store.fetch_all().await.unwrap(), sample_leads());
}

#[tokio::test]
async fn replace_posts_full_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/leads"))
        .and(body_json(sample_leads()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Leads saved successfully"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = HttpLeadStore::new(&config_for(&server)).unwrap();
    store.replace_all(&sample_leads()).await.unwrap();
}

#[tokio::test]
async fn error_status_becomes_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/leads"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Server error: disk I/O error"))
        .mount(&server)
        .await;

    let store = HttpLeadStore::new(&config_for(&server)).unwrap();
    let err = store.replace_all(&sample_leads()).await.unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Transaction);
    assert!(matches!(
        err,
        StoreError::Rejected { status: 500, ref message } if message.contains("disk I/O")
    ));
}

#[tokio::test]
async fn bad_request_is_malformed_kind() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Malformed payload: oops"))
        .mount(&server)
        .await;

    let store = HttpLeadStore::new(&config_for(&server)).unwrap();
    let err = store.replace_all(&[]).await.unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Malformed);
}

#[tokio::test]
async fn undecodable_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let store = HttpLeadStore::new(&config_for(&server)).unwrap();
    assert!(matches!(
        store.fetch_all().await,
        Err(StoreError::Malformed(_))
    ));
}

#[tokio::test]
async fn unreachable_api_is_transport() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let config = ClientConfig::new(format!("http://{addr}")).with_timeout(Duration::from_secs(2));

    let store = HttpLeadStore::new(&config).unwrap();
    let err = store.fetch_all().await.unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Transport);
}

#[tokio::test]
async fn message_client_returns_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate-message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": " See you soon? "})))
        .mount(&server)
        .await;

    let client = MessageClient::new(&config_for(&server)).unwrap();
    let text = client
        .generate(&MessageRequest::new("Ada", "Acme"))
        .await
        .unwrap();
    assert_eq!(text, "See you soon?");
}

#[tokio::test]
async fn message_client_surfaces_server_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate-message"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string("Failed to generate message: quota"),
        )
        .mount(&server)
        .await;

    let client = MessageClient::new(&config_for(&server)).unwrap();
    let err = client
        .generate(&MessageRequest::new("Ada", "Acme"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GenerateError::Provider {
            status: 500,
            body: "Failed to generate message: quota".into()
        }
    );
}
