//! End-to-end tests for Request Desk.
//!
//! Each test boots the real router (middleware included) on an ephemeral
//! port over a seeded [`MemoryStore`] and talks to it with `reqwest`, so no
//! database or running server is needed:
//!
//! ```bash
//! cargo test -p request-desk-integration-tests
//! ```

use std::sync::Arc;

use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use request_desk_server::db::MemoryStore;
use request_desk_server::services::{SeedFile, SettingsCache, apply_seed};
use request_desk_server::{AppState, app};

/// Accounts every test server starts with.
pub const SEED: &str = r#"
users:
  - email: solicitante@exemplo.com
    password: solicitante123
    role: solicitante
  - email: responsavel@exemplo.com
    password: responsavel123
    role: responsavel
  - email: solicitante.ti@exemplo.com
    password: solti123
    role: solicitante_ti
  - email: responsavel.ti@exemplo.com
    password: resti123
    role: responsavel_ti
"#;

/// A running server plus a client pointed at it. The server stops on drop.
pub struct TestServer {
    pub client: Client,
    base_url: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Boot a server with the [`SEED`] accounts and no CORS allow-list.
    pub async fn start() -> Self {
        Self::start_with_origins(&[]).await
    }

    /// Boot a server that only allows the given CORS origins.
    pub async fn start_with_origins(allowed_origins: &[String]) -> Self {
        let store = MemoryStore::new();
        let seed = SeedFile::from_yaml(SEED).expect("Failed to parse seed");
        apply_seed(&store, seed).await.expect("Failed to seed store");

        let state = AppState::new(Arc::new(store), SettingsCache::InProcess);
        let router = app(state, allowed_origins);
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server failed");
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            handle,
        }
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed");
        read(resp).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST failed");
        read(resp).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("PUT failed");
        read(resp).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("PATCH failed");
        read(resp).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Status and JSON body (`null` when the body is empty).
pub async fn read(resp: Response) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = resp.bytes().await.expect("Failed to read response body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    };
    (status, body)
}
