//! The settings row (`id = 1`).

use async_trait::async_trait;

use request_desk_core::Settings;

use super::PgStore;
use crate::db::RepositoryError;
use crate::db::store::SettingsStore;

#[async_trait]
impl SettingsStore for PgStore {
    async fn load_settings(&self) -> Result<Option<Settings>, RepositoryError> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT sector, name_or_store FROM settings WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(sector, name_or_store)| Settings {
            sector,
            name_or_store,
        }))
    }

    async fn save_settings(&self, settings: &Settings) -> Result<Settings, RepositoryError> {
        let (sector, name_or_store): (String, String) = sqlx::query_as(
            "INSERT INTO settings (id, sector, name_or_store) VALUES (1, $1, $2) \
             ON CONFLICT (id) DO UPDATE SET sector = EXCLUDED.sector, \
             name_or_store = EXCLUDED.name_or_store, updated_at = NOW() \
             RETURNING sector, name_or_store",
        )
        .bind(&settings.sector)
        .bind(&settings.name_or_store)
        .fetch_one(&self.pool)
        .await?;

        Ok(Settings {
            sector,
            name_or_store,
        })
    }

    async fn init_settings(&self, settings: &Settings) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO settings (id, sector, name_or_store) VALUES (1, $1, $2) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&settings.sector)
        .bind(&settings.name_or_store)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
