//! Persistence for orders, TI tickets, users and the settings row.
//!
//! Handlers never talk to a database directly; they go through the
//! [`Store`] trait family so the API runs unchanged over [`PgStore`] or
//! [`MemoryStore`].
//!
//! # Tables
//!
//! - `users` - Login accounts (Argon2id hashes, never plaintext)
//! - `orders` - Material orders
//! - `ti_tickets` - IT support tickets
//! - `settings` - Single row (`id = 1`) holding the selected sector/store
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p request-desk-cli -- migrate
//! ```

pub mod memory;
pub mod pg;
pub mod store;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use memory::MemoryStore;
pub use pg::PgStore;
pub use store::{
    HealthCheck, NewUser, OnConflict, OrderStore, SettingsStore, Store, TicketStore,
    UpsertOutcome, UserCredentials, UserStore,
};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply pending migrations from `crates/server/migrations`.
///
/// # Errors
///
/// Returns `MigrateError` if a migration fails or the history diverges.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
