//! Liveness and readiness probes.

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

/// Liveness body.
#[derive(Debug, Serialize)]
pub struct Health {
    pub ok: bool,
    pub now: DateTime<Utc>,
}

/// Readiness body.
#[derive(Debug, Serialize)]
pub struct Readiness {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

/// Liveness health check endpoint.
///
/// GET /health, GET /api/health
///
/// Does not check dependencies.
pub async fn health() -> Json<Health> {
    Json(Health {
        ok: true,
        now: Utc::now(),
    })
}

/// Readiness health check endpoint.
///
/// GET /health/ready
///
/// Returns 503 Service Unavailable if the store is not reachable.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    match state.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Readiness {
                ok: true,
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Readiness {
                    ok: false,
                    error: Some("store unavailable"),
                }),
            )
        }
    }
}
