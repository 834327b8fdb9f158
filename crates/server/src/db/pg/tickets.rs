//! TI ticket queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use request_desk_core::{
    ListFilter, Listable, NewTicket, PageRequest, Slice, Status, TicketId, TicketPatch, TiTicket,
};

use super::{PgStore, Table, select_slice};
use crate::db::RepositoryError;
use crate::db::store::TicketStore;

const COLUMNS: &str =
    "id, title, description, sector, name_or_store, status, response, created_at, updated_at";

const TABLE: Table = Table {
    name: "ti_tickets",
    columns: COLUMNS,
    search_columns: TiTicket::SEARCH_COLUMNS,
};

#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: i32,
    title: String,
    description: Option<String>,
    sector: String,
    name_or_store: String,
    status: String,
    response: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TicketRow> for TiTicket {
    type Error = RepositoryError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<Status>().map_err(|e| {
            RepositoryError::DataCorruption(format!("ti ticket {}: {e}", row.id))
        })?;

        Ok(Self {
            id: TicketId::new(row.id),
            title: row.title,
            description: row.description,
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
impl TicketStore for PgStore {
    async fn create_ticket(&self, input: NewTicket) -> Result<TiTicket, RepositoryError> {
        let row: TicketRow = sqlx::query_as(&format!(
            "INSERT INTO ti_tickets (title, description, sector, name_or_store, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .bind(input.title)
        .bind(input.description)
        .bind(input.sector)
        .bind(input.name_or_store)
        .bind(Status::Aberto.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn find_ticket(&self, id: TicketId) -> Result<Option<TiTicket>, RepositoryError> {
        let row: Option<TicketRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM ti_tickets WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_tickets(
        &self,
        filter: &ListFilter,
        page: Option<PageRequest>,
    ) -> Result<Slice<TiTicket>, RepositoryError> {
        let slice = select_slice::<TicketRow>(&self.pool, &TABLE, filter, page).await?;
        Ok(Slice {
            items: slice
                .items
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<_, _>>()?,
            total: slice.total,
        })
    }

    async fn update_ticket(
        &self,
        id: TicketId,
        patch: &TicketPatch,
    ) -> Result<TiTicket, RepositoryError> {
        let row: Option<TicketRow> = sqlx::query_as(&format!(
            "UPDATE ti_tickets SET \
                 status = COALESCE($2, status), \
                 response = CASE WHEN $3 THEN $4 ELSE response END, \
                 description = CASE WHEN $5 THEN $6 ELSE description END, \
                 updated_at = NOW() \
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(patch.status.map(|s| s.as_str()))
        .bind(patch.response.is_some())
        .bind(patch.response.clone().flatten())
        .bind(patch.description.is_some())
        .bind(patch.description.clone().flatten())
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }
}
