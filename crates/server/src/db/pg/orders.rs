//! Order queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use request_desk_core::{
    ListFilter, Listable, NewOrder, Order, OrderId, OrderPatch, PageRequest, Slice, Status,
};

use super::{PgStore, Table, select_slice};
use crate::db::RepositoryError;
use crate::db::store::OrderStore;

const COLUMNS: &str =
    "id, item, quantity, obs, sector, name_or_store, status, response, created_at, updated_at";

const TABLE: Table = Table {
    name: "orders",
    columns: COLUMNS,
    search_columns: Order::SEARCH_COLUMNS,
};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    item: String,
    quantity: i32,
    obs: Option<String>,
    sector: String,
    name_or_store: String,
    status: String,
    response: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<Status>().map_err(|e| {
            RepositoryError::DataCorruption(format!("order {}: {e}", row.id))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            item: row.item,
            quantity: row.quantity,
            obs: row.obs,
            sector: row.sector,
            name_or_store: row.name_or_store,
            status,
            response: row.response,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn create_order(&self, input: NewOrder) -> Result<Order, RepositoryError> {
        let row: OrderRow = sqlx::query_as(&format!(
            "INSERT INTO orders (item, quantity, obs, sector, name_or_store, status) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLUMNS}"
        ))
        .bind(input.item)
        .bind(input.quantity)
        .bind(input.obs)
        .bind(input.sector)
        .bind(input.name_or_store)
        .bind(Status::Aberto.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM orders WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_orders(
        &self,
        filter: &ListFilter,
        page: Option<PageRequest>,
    ) -> Result<Slice<Order>, RepositoryError> {
        let slice = select_slice::<OrderRow>(&self.pool, &TABLE, filter, page).await?;
        Ok(Slice {
            items: slice
                .items
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
            total: slice.total,
        })
    }

    async fn update_order(
        &self,
        id: OrderId,
        patch: &OrderPatch,
    ) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "UPDATE orders SET \
                 status = COALESCE($2, status), \
                 response = CASE WHEN $3 THEN $4 ELSE response END, \
                 obs = CASE WHEN $5 THEN $6 ELSE obs END, \
                 quantity = COALESCE($7, quantity), \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.response.is_some())
        .bind(patch.response.clone().flatten())
        .bind(patch.obs.is_some())
        .bind(patch.obs.clone().flatten())
        .bind(patch.quantity)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }
}
