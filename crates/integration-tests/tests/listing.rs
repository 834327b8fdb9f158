//! Filtered and paginated listings.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use request_desk_integration_tests::TestServer;

async fn seed_orders(server: &TestServer) {
    for (item, obs, sector) in [
        ("Caneta azul", "", "RH"),
        ("Papel", "comprar ABC", "RH"),
        ("Toner", "modelo abc-12", "Vendas"),
        ("Cadeira", "", "Vendas"),
    ] {
        let (status, _) = server
            .post(
                "/api/orders",
                &json!({
                    "item": item,
                    "quantity": 1,
                    "obs": obs,
                    "sector": sector,
                    "nameOrStore": "Loja 1"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

fn items(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|order| order["item"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_listing_is_newest_first() {
    let server = TestServer::start().await;
    seed_orders(&server).await;

    let (status, list) = server.get("/api/orders").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items(&list), ["Cadeira", "Toner", "Papel", "Caneta azul"]);
}

#[tokio::test]
async fn test_free_text_is_case_insensitive() {
    let server = TestServer::start().await;
    seed_orders(&server).await;

    let (_, list) = server.get("/api/orders?q=abc").await;
    assert_eq!(items(&list), ["Toner", "Papel"]);

    let (_, list) = server.get("/api/orders?q=abc&sector=RH").await;
    assert_eq!(items(&list), ["Papel"]);

    let (_, list) = server.get("/api/orders?q=%25").await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_status_filter() {
    let server = TestServer::start().await;
    seed_orders(&server).await;

    let (_, list) = server.get("/api/orders").await;
    let toner = list
        .as_array()
        .unwrap()
        .iter()
        .find(|order| order["item"] == "Toner")
        .unwrap();
    let (status, _) = server
        .put(
            &format!("/api/orders/{}", toner["id"]),
            &json!({"status": "finalizado"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, done) = server.get("/api/orders?status=finalizado").await;
    assert_eq!(items(&done), ["Toner"]);

    let (_, open) = server.get("/api/orders?status=aberto&sector=Vendas").await;
    assert_eq!(items(&open), ["Cadeira"]);

    let (status, _) = server.get("/api/orders?status=fechado").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Blank parameters are ignored
    let (_, all) = server.get("/api/orders?status=&q=").await;
    assert_eq!(all.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_pagination() {
    let server = TestServer::start().await;
    seed_orders(&server).await;

    let (status, page) = server.get("/api/orders?page=2&pageSize=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 4);
    assert_eq!(page["page"], 2);
    assert_eq!(page["pageSize"], 3);
    assert_eq!(items(&page["items"]), ["Caneta azul"]);

    let (status, page) = server.get("/api/orders?page=9&pageSize=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 4);
    assert_eq!(page["items"], json!([]));

    let (_, page) = server.get("/api/orders?pageSize=1000").await;
    assert_eq!(page["pageSize"], 100);
    assert_eq!(page["page"], 1);

    for bad in ["page=0", "pageSize=0", "page=dois"] {
        let (status, _) = server.get(&format!("/api/orders?{bad}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");
    }
}

#[tokio::test]
async fn test_ticket_listing_filters() {
    let server = TestServer::start().await;
    for (title, description, name) in [
        ("Impressora", "atolando papel", "Loja 1"),
        ("Rede", "sem wifi", "Loja 2"),
        ("Email", "senha expirada", "Loja 1"),
    ] {
        server
            .post(
                "/api/ti/tickets",
                &json!({
                    "title": title,
                    "description": description,
                    "sector": "TI",
                    "nameOrStore": name
                }),
            )
            .await;
    }

    let (_, list) = server.get("/api/ti/tickets?nameOrStore=Loja%201").await;
    let titles: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Email", "Impressora"]);

    let (_, list) = server.get("/api/ti/tickets?q=WIFI").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["title"], "Rede");
}
