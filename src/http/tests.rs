//! Tests for the HTTP client module

use super::*;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind};
use crate::types::{JsonObject, Method};
use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> KatanaClient {
    let config = ClientConfig::builder("test-key")
        .base_url(format!("{}/v1", server.uri()))
        .min_interval(Duration::ZERO)
        .build();
    KatanaClient::new(config).unwrap()
}

fn object(value: serde_json::Value) -> JsonObject {
    value.as_object().cloned().unwrap()
}

// ============================================================================
// ApiRequest Tests
// ============================================================================

#[test]
fn test_api_request_builder() {
    let request = ApiRequest::post("/sales_orders")
        .body(object(json!({"customer_id": 1})))
        .query_param("limit", 10)
        .query_param("status", "NOT_SHIPPED");

    assert_eq!(request.method, Method::POST);
    assert_eq!(request.endpoint, "/sales_orders");
    assert_eq!(request.effective_body().unwrap()["customer_id"], 1);
    assert_eq!(
        request.query_pairs(),
        vec![
            ("limit".to_string(), "10".to_string()),
            ("status".to_string(), "NOT_SHIPPED".to_string()),
        ]
    );
}

#[test]
fn test_empty_body_is_not_effective() {
    let request = ApiRequest::patch("/products/1").body(JsonObject::new());
    assert!(request.effective_body().is_none());
    assert!(ApiRequest::get("/products").query_pairs().is_empty());
}

#[test]
fn test_encode_query_shapes() {
    let query = object(json!({
        "search": "widget",
        "archived": false,
        "customer_id": 0,
        "skip": null,
        "ids": [1, 2],
        "created_at": {"gte": "2024-01-01", "lte": "2024-12-31"}
    }));

    let pairs = encode_query(&query);
    assert_eq!(
        pairs,
        vec![
            ("search".to_string(), "widget".to_string()),
            ("archived".to_string(), "false".to_string()),
            ("customer_id".to_string(), "0".to_string()),
            ("ids".to_string(), "1".to_string()),
            ("ids".to_string(), "2".to_string()),
            ("created_at[gte]".to_string(), "2024-01-01".to_string()),
            ("created_at[lte]".to_string(), "2024-12-31".to_string()),
        ]
    );
}

// ============================================================================
// Request Executor Tests
// ============================================================================

#[tokio::test]
async fn test_send_get_with_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/products/42"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42, "name": "Chair"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let product = client
        .send(Method::GET, "/products/42", None, None)
        .await
        .unwrap();

    assert_eq!(product["name"], "Chair");
}

#[tokio::test]
async fn test_send_attaches_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/sales_orders"))
        .and(query_param("status", "NOT_SHIPPED"))
        .and(query_param("created_at[gte]", "2024-01-01T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let query = object(json!({
        "status": "NOT_SHIPPED",
        "created_at[gte]": "2024-01-01T00:00:00Z"
    }));

    let response = client
        .send(Method::GET, "/sales_orders", None, Some(query))
        .await
        .unwrap();
    assert_eq!(response, json!({"data": []}));
}

#[tokio::test]
async fn test_send_skips_empty_body_and_query() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/customers/7"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let response = client
        .send(
            Method::DELETE,
            "/customers/7",
            Some(JsonObject::new()),
            Some(JsonObject::new()),
        )
        .await
        .unwrap();

    assert_eq!(response, json!({}));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query().is_none());
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_send_post_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/customers"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({"name": "Acme", "currency": "USD"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9, "name": "Acme"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let created = client
        .send(
            Method::POST,
            "/customers",
            Some(object(json!({"name": "Acme", "currency": "USD"}))),
            None,
        )
        .await
        .unwrap();

    assert_eq!(created["id"], 9);
}

#[tokio::test]
async fn test_send_returns_bare_arrays_unmodified() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/inventory/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"a": 1}, {"a": 2}])))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let response = client
        .send(Method::GET, "/inventory/summary", None, None)
        .await
        .unwrap();
    assert_eq!(response, json!([{"a": 1}, {"a": 2}]));
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/products"))
        .and(header("X-Env", "staging"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder("test-key")
        .base_url(format!("{}/v1/", server.uri()))
        .min_interval(Duration::ZERO)
        .header("X-Env", "staging")
        .build();
    let client = KatanaClient::new(config).unwrap();

    client.send(Method::GET, "products", None, None).await.unwrap();
}

// ============================================================================
// Error Classification Tests
// ============================================================================

async fn send_with_status(status: u16, body: &str) -> Error {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/materials/1"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;

    let client = test_client(&server);
    client
        .send(Method::GET, "/materials/1", None, None)
        .await
        .unwrap_err()
}

#[tokio::test]
async fn test_429_is_rate_limited_regardless_of_body() {
    let err = send_with_status(429, r#"{"error":{"errors":{"x":["y"]}}}"#).await;
    assert_eq!(err.kind(), ErrorKind::RateLimited);
    assert!(err.to_string().contains("300/minute"));

    let err = send_with_status(429, "").await;
    assert_eq!(err.kind(), ErrorKind::RateLimited);
}

#[tokio::test]
async fn test_401_403_404() {
    let err = send_with_status(401, "{}").await;
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.to_string(), "Invalid API key");

    let err = send_with_status(403, "{}").await;
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = send_with_status(404, "{}").await;
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.api_error().unwrap().status(), 404);
}

#[tokio::test]
async fn test_422_carries_field_errors() {
    let err = send_with_status(422, r#"{"error":{"errors":{"field1":["msg"]}}}"#).await;
    assert_eq!(err.kind(), ErrorKind::Validation);

    let api = err.api_error().unwrap();
    assert!(api.description.as_deref().unwrap().contains("field1: msg"));
    assert_eq!(
        api.field_errors.clone().unwrap(),
        vec![("field1".to_string(), vec!["msg".to_string()])]
    );
}

#[tokio::test]
async fn test_other_status_is_unknown_with_raw_body() {
    let err = send_with_status(502, "upstream exploded").await;
    assert_eq!(err.kind(), ErrorKind::Unknown);
    assert_eq!(err.to_string(), "HTTP 502: upstream exploded");
}

#[tokio::test]
async fn test_invalid_json_success_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .send(Method::GET, "/products", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::JsonParse(_)));
}

#[test]
fn test_client_rejects_invalid_config() {
    let result = KatanaClient::new(ClientConfig::new(""));
    assert!(matches!(result, Err(Error::MissingConfigField { .. })));
}

// ============================================================================
// Rate Limiting Tests
// ============================================================================

#[tokio::test]
async fn test_sequential_sends_are_spaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let config = ClientConfig::builder("test-key")
        .base_url(format!("{}/v1", server.uri()))
        .build();
    let client = KatanaClient::new(config).unwrap();

    let start = Instant::now();
    client.send(Method::GET, "/products", None, None).await.unwrap();
    client.send(Method::GET, "/products", None, None).await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_clients_share_a_gate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let gate = std::sync::Arc::new(RateGate::new(Duration::from_millis(100)));
    let config = ClientConfig::builder("test-key")
        .base_url(format!("{}/v1", server.uri()))
        .build();
    let a = KatanaClient::with_rate_gate(config.clone(), gate.clone()).unwrap();
    let b = KatanaClient::with_rate_gate(config, gate).unwrap();

    let start = Instant::now();
    a.send(Method::GET, "/products", None, None).await.unwrap();
    b.send(Method::GET, "/materials", None, None).await.unwrap();
    a.send(Method::GET, "/variants", None, None).await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(200));
}
