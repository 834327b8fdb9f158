//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET   /health                      - Liveness ({ok, now})
//! GET   /health/ready                - Store connectivity
//!
//! # API
//! GET   /api/health                  - Liveness ({ok, now})
//! POST  /api/login                   - Email/password -> role
//!
//! # Orders
//! GET   /api/orders                  - List (status, sector, nameOrStore, q, page, pageSize)
//! POST  /api/orders                  - Create
//! GET   /api/orders/{id}             - Detail
//! PUT   /api/orders/{id}             - Whitelisted patch
//! PATCH /api/orders/{id}/status      - Whitelisted patch
//!
//! # TI tickets
//! GET   /api/ti/tickets              - List
//! POST  /api/ti/tickets              - Create
//! GET   /api/ti/tickets/{id}         - Detail
//! PUT   /api/ti/tickets/{id}         - Whitelisted patch
//! PATCH /api/ti/tickets/{id}/status  - Whitelisted patch
//!
//! # Settings
//! GET   /api/settings                - Current (blank until first write)
//! POST  /api/settings                - Overwrite
//! ```
//!
//! Anything else is a 404 `{"error": "route not found"}`. A known path with
//! the wrong method is a 405 `{"error": "method not allowed"}`.

pub mod health;
pub mod login;
pub mod orders;
pub mod settings;
pub mod tickets;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, patch, post},
};
use serde::Serialize;

use request_desk_core::{Page, PageRequest, Slice};

use crate::error::ErrorBody;
use crate::state::AppState;

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/login", post(login::login))
        .route("/orders", get(orders::list).post(orders::create))
        .route("/orders/{id}", get(orders::show).put(orders::update))
        .route("/orders/{id}/status", patch(orders::update))
        .route("/ti/tickets", get(tickets::list).post(tickets::create))
        .route("/ti/tickets/{id}", get(tickets::show).put(tickets::update))
        .route("/ti/tickets/{id}/status", patch(tickets::update))
        .route("/settings", get(settings::show).post(settings::save))
        .method_not_allowed_fallback(method_not_allowed)
}

/// Create the full route tree, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes())
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

async fn route_not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("route not found")))
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody::new("method not allowed")),
    )
}

/// Listing body: a bare array, or a page envelope when pagination was asked for.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ListResponse<T> {
    All(Vec<T>),
    Paged(Page<T>),
}

impl<T> ListResponse<T> {
    #[must_use]
    pub fn new(slice: Slice<T>, page: Option<PageRequest>) -> Self {
        match page {
            None => Self::All(slice.items),
            Some(request) => Self::Paged(Page::new(slice, request)),
        }
    }
}
