//! Settings singleton routes.

use axum::{Json, extract::State};

use request_desk_core::Settings;
use request_desk_core::validation::validate_settings;

use crate::error::Result;
use crate::extract::JsonFields;
use crate::state::AppState;

/// GET /api/settings
///
/// Blank settings until the first write.
pub async fn show(State(state): State<AppState>) -> Result<Json<Settings>> {
    Ok(Json(state.settings().read().await?))
}

/// POST /api/settings
///
/// Full overwrite; absent values become `""`.
pub async fn save(
    State(state): State<AppState>,
    JsonFields(fields): JsonFields,
) -> Result<Json<Settings>> {
    let settings = validate_settings(&fields)?;
    let saved = state.settings().write(&settings).await?;
    tracing::info!(sector = %saved.sector, name_or_store = %saved.name_or_store, "settings saved");
    Ok(Json(saved))
}
