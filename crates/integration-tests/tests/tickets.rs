//! TI ticket lifecycle over HTTP.

use reqwest::StatusCode;
use serde_json::{Value, json};

use request_desk_integration_tests::TestServer;

async fn create_ticket(server: &TestServer, title: &str) -> Value {
    let (status, body) = server
        .post(
            "/api/ti/tickets",
            &json!({"title": title, "sector": "Financeiro", "nameOrStore": "Loja 4"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn test_create_ticket_defaults() {
    let server = TestServer::start().await;

    let ticket = create_ticket(&server, "Sem internet").await;
    assert_eq!(ticket["status"], "aberto");
    assert!(ticket["description"].is_null());
    assert!(ticket["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_ticket_requires_title() {
    let server = TestServer::start().await;

    let (status, body) = server
        .post(
            "/api/ti/tickets",
            &json!({"description": "tela azul", "sector": "TI", "nameOrStore": "Ana"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "missing required fields: title");
}

#[tokio::test]
async fn test_ticket_whitelist() {
    let server = TestServer::start().await;
    let ticket = create_ticket(&server, "Mouse quebrado").await;
    let path = format!("/api/ti/tickets/{}", ticket["id"]);

    // quantity and obs belong to orders, not tickets
    let (status, _) = server.put(&path, &json!({"quantity": 2, "obs": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server
        .put(
            &path,
            &json!({"description": "trocar mouse", "title": "ignorado", "status": "finalizado"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "trocar mouse");
    assert_eq!(body["title"], "Mouse quebrado");
    assert_eq!(body["status"], "finalizado");
}

#[tokio::test]
async fn test_ticket_status_route() {
    let server = TestServer::start().await;
    let ticket = create_ticket(&server, "VPN").await;
    let path = format!("/api/ti/tickets/{}/status", ticket["id"]);

    let (status, _) = server.patch(&path, &json!({"status": 3})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = server
        .patch(&path, &json!({"status": "em_andamento", "response": "verificando"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "em_andamento");
    assert_eq!(body["response"], "verificando");
}

#[tokio::test]
async fn test_unknown_ticket_is_404() {
    let server = TestServer::start().await;

    let (status, body) = server
        .patch("/api/ti/tickets/42/status", &json!({"status": "finalizado"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "ti ticket 42 not found");

    let (status, _) = server.get("/api/ti/tickets/x1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
