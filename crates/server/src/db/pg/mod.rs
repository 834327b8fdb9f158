//! `PostgreSQL` store.
//!
//! Queries are built at runtime (`query_as` / `QueryBuilder`) rather than with
//! the checked macros, so the crate builds without a live database.

mod orders;
mod settings;
mod tickets;
mod users;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use request_desk_core::{ListFilter, PageRequest, Slice};

use super::RepositoryError;
use super::store::HealthCheck;

/// Store backed by a `PgPool`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// A listable table: its name, selected columns and `q` search columns.
struct Table {
    name: &'static str,
    columns: &'static str,
    search_columns: &'static [&'static str],
}

/// Run a filtered, newest-first listing and, when paginated, a matching count.
async fn select_slice<R>(
    pool: &PgPool,
    table: &Table,
    filter: &ListFilter,
    page: Option<PageRequest>,
) -> Result<Slice<R>, RepositoryError>
where
    R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut query = QueryBuilder::<Postgres>::new("SELECT ");
    query.push(table.columns).push(" FROM ").push(table.name);
    push_filter(&mut query, filter, table.search_columns);
    query.push(" ORDER BY created_at DESC, id DESC");
    if let Some(request) = page {
        query
            .push(" LIMIT ")
            .push_bind(i64::from(request.limit()))
            .push(" OFFSET ")
            .push_bind(i64::try_from(request.offset()).unwrap_or(i64::MAX));
    }

    let rows: Vec<R> = query.build_query_as().fetch_all(pool).await?;

    let total = match page {
        None => rows.len() as u64,
        Some(_) => {
            let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ");
            count.push(table.name);
            push_filter(&mut count, filter, table.search_columns);
            let total: i64 = count.build_query_scalar().fetch_one(pool).await?;
            u64::try_from(total).map_err(|_| {
                RepositoryError::DataCorruption(format!("negative row count: {total}"))
            })?
        }
    };

    Ok(Slice { items: rows, total })
}

fn push_filter(
    query: &mut QueryBuilder<'_, Postgres>,
    filter: &ListFilter,
    search_columns: &[&str],
) {
    query.push(" WHERE TRUE");
    if let Some(status) = filter.status {
        query.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(sector) = &filter.sector {
        query.push(" AND sector = ").push_bind(sector.clone());
    }
    if let Some(name_or_store) = &filter.name_or_store {
        query
            .push(" AND name_or_store = ")
            .push_bind(name_or_store.clone());
    }
    if let Some(q) = &filter.q {
        let pattern = format!("%{}%", escape_like(q));
        query.push(" AND (");
        for (i, column) in search_columns.iter().enumerate() {
            if i > 0 {
                query.push(" OR ");
            }
            query.push(*column).push(" ILIKE ").push_bind(pattern.clone());
        }
        query.push(")");
    }
}

/// Escape `LIKE` metacharacters so `q` matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Map a unique violation to `Conflict`, anything else to `Database`.
fn map_unique_violation(err: sqlx::Error, what: &str) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(format!("{what} already exists"))
        }
        _ => RepositoryError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use request_desk_core::Status;

    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("abc"), "abc");
    }

    #[test]
    fn test_filter_sql_shape() {
        let filter = ListFilter {
            status: Some(Status::Aberto),
            sector: Some("RH".to_owned()),
            name_or_store: None,
            q: Some("abc".to_owned()),
        };
        let mut query = QueryBuilder::<Postgres>::new("SELECT id FROM orders");
        push_filter(&mut query, &filter, &["item", "obs", "response"]);
        assert_eq!(
            query.sql(),
            "SELECT id FROM orders WHERE TRUE AND status = $1 AND sector = $2 \
             AND (item ILIKE $3 OR obs ILIKE $4 OR response ILIKE $5)"
        );
    }

    #[test]
    fn test_empty_filter_sql() {
        let mut query = QueryBuilder::<Postgres>::new("SELECT id FROM ti_tickets");
        push_filter(&mut query, &ListFilter::default(), &["title"]);
        assert_eq!(query.sql(), "SELECT id FROM ti_tickets WHERE TRUE");
    }
}
