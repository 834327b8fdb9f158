//! Material order routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use request_desk_core::validation::validate_new_order;
use request_desk_core::{Order, OrderId, whitelist_order_patch};

use super::ListResponse;
use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::extract::{JsonFields, ListParams};
use crate::state::AppState;

/// GET /api/orders
pub async fn list(
    State(state): State<AppState>,
    ListParams(query): ListParams,
) -> Result<Json<ListResponse<Order>>> {
    let (filter, page) = query.parse()?;
    let slice = state.store().list_orders(&filter, page).await?;
    Ok(Json(ListResponse::new(slice, page)))
}

/// POST /api/orders
pub async fn create(
    State(state): State<AppState>,
    JsonFields(fields): JsonFields,
) -> Result<(StatusCode, Json<Order>)> {
    let input = validate_new_order(&fields)?;
    let order = state.store().create_order(input).await?;
    tracing::info!(order_id = %order.id, sector = %order.sector, "order created");
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders/{id}
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Order>> {
    let id: OrderId = id.parse()?;
    state
        .store()
        .find_order(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PUT /api/orders/{id}, PATCH /api/orders/{id}/status
///
/// The id and the patch are both checked before the store is touched.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonFields(fields): JsonFields,
) -> Result<Json<Order>> {
    let id: OrderId = id.parse()?;
    let patch = whitelist_order_patch(&fields)?;

    let order = state
        .store()
        .update_order(id, &patch)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => not_found(id),
            other => other.into(),
        })?;

    tracing::info!(order_id = %order.id, status = %order.status, "order updated");
    Ok(Json(order))
}

fn not_found(id: OrderId) -> AppError {
    AppError::NotFound(format!("order {id}"))
}
