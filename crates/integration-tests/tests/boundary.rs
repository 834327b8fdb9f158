//! Behaviour shared by every route: health, fallbacks, CORS and request ids.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use reqwest::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
use serde_json::json;

use request_desk_integration_tests::{TestServer, read};

#[tokio::test]
async fn test_health_endpoints() {
    let server = TestServer::start().await;

    for path in ["/health", "/api/health"] {
        let (status, body) = server.get(path).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    let (status, body) = server.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn test_unmatched_route_is_json_404() {
    let server = TestServer::start().await;

    let (status, body) = server.get("/api/users").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "route not found"}));
}

#[tokio::test]
async fn test_wrong_method_is_json_405() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .delete(server.url("/api/orders"))
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"error": "method not allowed"}));

    let (status, body) = server.post("/health", &json!({})).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"error": "method not allowed"}));
}

#[tokio::test]
async fn test_malformed_body_is_json_400() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .post(server.url("/api/ti/tickets"))
        .header("content-type", "application/json")
        .body("[1, 2")
        .send()
        .await
        .unwrap();
    let (status, body) = read(resp).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = server.post("/api/ti/tickets", &json!(["title"])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "malformed request body: expected a JSON object");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .get(server.url("/health"))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "abc-123");

    let resp = server.client.get(server.url("/health")).send().await.unwrap();
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_cors_allow_list() {
    let server =
        TestServer::start_with_origins(&["https://painel.exemplo.com".to_string()]).await;

    let resp = server
        .client
        .get(server.url("/api/settings"))
        .header(ORIGIN, "https://painel.exemplo.com")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://painel.exemplo.com"
    );

    let resp = server
        .client
        .get(server.url("/api/settings"))
        .header(ORIGIN, "https://intruso.exemplo.com")
        .send()
        .await
        .unwrap();
    assert!(!resp.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN));
}
