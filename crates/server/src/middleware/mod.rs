//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (binary only)
//! 2. CORS
//! 3. `TraceLayer` (`http_request` span)
//! 4. Request ID (recorded on the span above)
//! 5. Catch panic (500 JSON)

pub mod cors;
pub mod request_id;

pub use cors::cors_layer;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
