//! Database migration command.
//!
//! ```bash
//! request-desk-cli migrate
//! ```
//!
//! Migration files live in `crates/server/migrations/`.

use request_desk_server::db::run_migrations;

use super::connect;

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
