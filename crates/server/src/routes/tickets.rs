//! TI ticket routes. Same shape as the order routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use request_desk_core::validation::validate_new_ticket;
use request_desk_core::{TicketId, TiTicket, whitelist_ticket_patch};

use super::ListResponse;
use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::extract::{JsonFields, ListParams};
use crate::state::AppState;

/// GET /api/ti/tickets
pub async fn list(
    State(state): State<AppState>,
    ListParams(query): ListParams,
) -> Result<Json<ListResponse<TiTicket>>> {
    let (filter, page) = query.parse()?;
    let slice = state.store().list_tickets(&filter, page).await?;
    Ok(Json(ListResponse::new(slice, page)))
}

/// POST /api/ti/tickets
pub async fn create(
    State(state): State<AppState>,
    JsonFields(fields): JsonFields,
) -> Result<(StatusCode, Json<TiTicket>)> {
    let input = validate_new_ticket(&fields)?;
    let ticket = state.store().create_ticket(input).await?;
    tracing::info!(ticket_id = %ticket.id, sector = %ticket.sector, "ti ticket created");
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /api/ti/tickets/{id}
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TiTicket>> {
    let id: TicketId = id.parse()?;
    state
        .store()
        .find_ticket(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PUT /api/ti/tickets/{id}, PATCH /api/ti/tickets/{id}/status
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonFields(fields): JsonFields,
) -> Result<Json<TiTicket>> {
    let id: TicketId = id.parse()?;
    let patch = whitelist_ticket_patch(&fields)?;

    let ticket = state
        .store()
        .update_ticket(id, &patch)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => not_found(id),
            other => other.into(),
        })?;

    tracing::info!(ticket_id = %ticket.id, status = %ticket.status, "ti ticket updated");
    Ok(Json(ticket))
}

fn not_found(id: TicketId) -> AppError {
    AppError::NotFound(format!("ti ticket {id}"))
}
