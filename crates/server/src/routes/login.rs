//! Login.

use axum::{Json, extract::State};
use serde::Serialize;

use request_desk_core::Role;
use request_desk_core::validation::validate_login;

use crate::error::Result;
use crate::extract::JsonFields;
use crate::state::AppState;

/// Successful login: the account's role, nothing else.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub role: Role,
}

/// POST /api/login
///
/// # Errors
///
/// 400 when `email` or `password` is missing, 401 on any credential mismatch.
pub async fn login(
    State(state): State<AppState>,
    JsonFields(fields): JsonFields,
) -> Result<Json<LoginResponse>> {
    let credentials = validate_login(&fields)?;
    let role = state.auth().login(&credentials).await?;
    Ok(Json(LoginResponse { role }))
}
