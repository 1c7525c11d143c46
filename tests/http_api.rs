//! HTTP surface tests: routing, status mapping and request ids.

use alloy::primitives::{Address, B256};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

use x402_trust::blockchain::checksum_string;
use x402_trust::config::ServerConfig;
use x402_trust::http::AppState;
use x402_trust::{HttpServer, Shutdown};

mod common;
use common::{buyer, skill, stranger, usdc, MockChain, MockProvider};

fn router(chain: &Arc<MockChain>) -> Router {
    HttpServer::build_router(
        &ServerConfig::default(),
        AppState {
            skill: Arc::new(skill(chain)),
        },
    )
}

fn post(path: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_check_provider_ok() {
    let chain = Arc::new(MockChain::new());
    chain.add_provider(Address::repeat_byte(0x11), MockProvider::active(760));

    let body = json!({ "provider_address": checksum_string(&Address::repeat_byte(0x11)) }).to_string();
    let (status, json) = send(router(&chain), post("/v1/actions/check_provider", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["score"], json!(760));
    assert_eq!(json["tier"], json!("Excellent"));
}

#[tokio::test]
async fn test_validation_error_is_400() {
    let chain = Arc::new(MockChain::new());
    let (status, json) = send(
        router(&chain),
        post("/v1/actions/check_provider", json!({ "provider_address": "bad" }).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Invalid address: bad" }));
}

#[tokio::test]
async fn test_empty_body_reports_missing_param() {
    let chain = Arc::new(MockChain::new());
    let (status, json) = send(router(&chain), post("/v1/actions/raise_dispute", Body::empty())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "payment_id is required" }));
}

#[tokio::test]
async fn test_non_object_body_is_400() {
    let chain = Arc::new(MockChain::new());
    let (status, json) = send(router(&chain), post("/v1/actions/check_provider", "[1, 2, 3]")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], json!("Request body must be a JSON object"));
}

#[tokio::test]
async fn test_precondition_failure_is_409() {
    let chain = Arc::new(MockChain::new());
    let id = B256::repeat_byte(0x0c);
    chain.insert_payment(id, stranger(), Address::repeat_byte(0x11), usdc(5), common::STATUS_PENDING);

    let body = json!({ "payment_id": id.to_string(), "response_data": "done" }).to_string();
    let (status, json) = send(router(&chain), post("/v1/actions/confirm_delivery", body)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json, json!({ "error": "Only buyer can confirm delivery" }));
}

#[tokio::test]
async fn test_remote_failure_is_502() {
    let chain = Arc::new(MockChain::new());
    chain.fail_reads("connection reset");

    let body = json!({ "provider_address": checksum_string(&buyer()) }).to_string();
    let (status, json) = send(router(&chain), post("/v1/actions/check_provider", body)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], json!("RPC error: connection reset"));
}

#[tokio::test]
async fn test_insufficient_balance_is_502() {
    let chain = Arc::new(MockChain::new());
    let body = json!({
        "provider_address": checksum_string(&Address::repeat_byte(0x11)),
        "amount_usdc": 5,
        "request_description": "Summary"
    })
    .to_string();
    let (status, json) = send(router(&chain), post("/v1/actions/secure_payment", body)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], json!("Insufficient USDC balance. Have: 0, Need: 5"));
}

#[tokio::test]
async fn test_unknown_action_is_404() {
    let chain = Arc::new(MockChain::new());
    let (status, json) = send(router(&chain), post("/v1/actions/refund_all", "{}")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "error": "Unknown action: refund_all" }));
}

#[tokio::test]
async fn test_list_actions() {
    let chain = Arc::new(MockChain::new());
    let (status, json) = send(router(&chain), get("/v1/actions")).await;

    assert_eq!(status, StatusCode::OK);
    let actions = json.as_array().unwrap();
    let names: Vec<&str> = actions.iter().map(|a| a["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec!["check_provider", "compare_providers", "secure_payment", "confirm_delivery", "raise_dispute"]
    );
    assert_eq!(actions[0]["signs_transactions"], json!(false));
    assert_eq!(actions[2]["signs_transactions"], json!(true));
    assert_eq!(actions[4]["required_params"], json!(["payment_id", "reason"]));
}

#[tokio::test]
async fn test_health_endpoint() {
    let chain = Arc::new(MockChain::new());
    let (status, json) = send(router(&chain), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["healthy"], json!(true));
    assert_eq!(json["chain_id"], json!(5_042_002));
}

#[tokio::test]
async fn test_request_id_header_is_set() {
    let chain = Arc::new(MockChain::new());
    let response = router(&chain).oneshot(get("/v1/actions")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));

    let request = Request::builder()
        .uri("/v1/actions")
        .header("x-request-id", "caller-supplied")
        .body(Body::empty())
        .unwrap();
    let response = router(&chain).oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "caller-supplied");
}

#[tokio::test]
async fn test_serve_and_shutdown() {
    let chain = Arc::new(MockChain::new());
    let server = HttpServer::new(Arc::new(skill(&chain)), &ServerConfig::default());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let handle = tokio::spawn(server.run(listener, shutdown.clone()));

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    assert!(response.contains("\"healthy\":true"));

    shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap();
    assert!(result.unwrap().is_ok());
}

#[tokio::test]
async fn test_confirmation_timeout_is_504() {
    let chain = Arc::new(MockChain::new());
    chain.add_provider(Address::repeat_byte(0x11), MockProvider::active(640));
    let id = B256::repeat_byte(0x0e);
    chain.insert_payment(id, buyer(), Address::repeat_byte(0x11), usdc(5), common::STATUS_PENDING);
    chain.leave_unconfirmed();

    let body = json!({ "payment_id": id.to_string(), "response_data": "done" }).to_string();
    let (status, json) = send(router(&chain), post("/v1/actions/confirm_delivery", body)).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json["success"], json!(false));
    let error = json["error"].as_str().unwrap();
    assert!(error.starts_with("Transaction 0x"), "{}", error);
    assert!(error.ends_with("not confirmed after 120 seconds"), "{}", error);
}
