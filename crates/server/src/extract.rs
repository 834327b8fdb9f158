//! Request extractors that reject with JSON errors.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{StatusCode, request::Parts},
};

use request_desk_core::validation::field_map_from_slice;
use request_desk_core::{FieldMap, ListQuery, ValidationError};

use crate::error::AppError;

/// Request body as a raw JSON object. An empty body is an empty object.
///
/// Bodies over axum's default limit are rejected with 413.
#[derive(Debug)]
pub struct JsonFields(pub FieldMap);

impl<S> FromRequest<S> for JsonFields
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::Body {
                    status: e.status(),
                    message: "request body too large".to_owned(),
                }
            } else {
                ValidationError::MalformedBody(e.body_text()).into()
            }
        })?;
        Ok(Self(field_map_from_slice(&bytes)?))
    }
}

/// Listing query string.
#[derive(Debug)]
pub struct ListParams(pub ListQuery);

impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<ListQuery>::from_request_parts(parts, state)
            .await
            .map_err(|_| ValidationError::InvalidQuery {
                name: "query",
                reason: "could not be parsed",
            })?;
        Ok(Self(query))
    }
}
