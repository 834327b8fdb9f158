//! CORS policy, built once from `ALLOWED_ORIGINS`.
//!
//! - Empty list: any origin, no credentials.
//! - Otherwise: only listed origins, with credentials.
//!
//! Requests without an `Origin` header are never affected.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Build the CORS layer for a configured origin list.
#[must_use]
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        tracing::info!("CORS: any origin");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    tracing::info!(origins = ?allowed_origins, "CORS: allow-list");

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        extract::Request,
        http::{StatusCode, header::ORIGIN},
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;

    fn app(origins: &[&str]) -> Router {
        let origins: Vec<String> = origins.iter().map(ToString::to_string).collect();
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(&origins))
    }

    async fn allow_origin(router: Router, origin: Option<&str>) -> (StatusCode, Option<String>) {
        let mut builder = Request::builder().uri("/");
        if let Some(origin) = origin {
            builder = builder.header(ORIGIN, origin);
        }
        let response = router
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let header = response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string());
        (response.status(), header)
    }

    #[tokio::test]
    async fn test_allow_list_echoes_listed_origin() {
        let (status, header) =
            allow_origin(app(&["https://app.example"]), Some("https://app.example")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(header.as_deref(), Some("https://app.example"));
    }

    #[tokio::test]
    async fn test_allow_list_omits_header_for_other_origins() {
        let (_, header) =
            allow_origin(app(&["https://app.example"]), Some("https://evil.example")).await;
        assert_eq!(header, None);
    }

    #[tokio::test]
    async fn test_request_without_origin_passes() {
        let (status, _) = allow_origin(app(&["https://app.example"]), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_list_allows_any_origin() {
        let (_, header) = allow_origin(app(&[]), Some("https://anything.example")).await;
        assert_eq!(header.as_deref(), Some("*"));
    }
}
