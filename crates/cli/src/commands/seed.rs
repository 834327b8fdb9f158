//! Seed user accounts and the settings row from a YAML file.
//!
//! Accounts that already exist keep their password and role, and an
//! existing settings row is not touched, so seeding twice is harmless.
//! See `seed/default.yaml` for the file format.

use std::path::Path;

use tracing::info;

use request_desk_server::db::PgStore;
use request_desk_server::services::{SeedFile, apply_seed};

use super::connect;

/// Apply the seed in `file_path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, an entry is
/// invalid, or a database operation fails.
pub async fn run(file_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Parse before connecting so a broken file fails fast
    info!(path = %file_path.display(), "Loading seed file");
    let seed = SeedFile::load(file_path).await?;
    info!(users = seed.users.len(), "Parsed seed file");

    let store = PgStore::new(connect().await?);
    let report = apply_seed(&store, seed).await?;

    info!(
        created = report.users_created,
        existing = report.users_existing,
        settings_created = report.settings_created,
        "Seed complete"
    );
    Ok(())
}
