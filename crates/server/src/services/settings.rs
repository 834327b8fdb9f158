//! Settings singleton.
//!
//! With [`SettingsCache::InProcess`], reads are served from a one-entry
//! `moka` cache. Every successful write replaces the cached value before
//! returning, and a cache fill never overlaps a write, so a read that starts
//! after a write in this process completes always sees it. Writes made
//! elsewhere (the CLI, another replica) are only picked up when the entry
//! expires, so the in-process cache is for a single server owning the store.
//! Shared databases use [`SettingsCache::Off`] and read the row every time.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::RwLock;
use tracing::debug;

use request_desk_core::Settings;

use crate::db::{RepositoryError, Store};

const SETTINGS_KEY: i32 = 1;
const SETTINGS_TTL: Duration = Duration::from_secs(60);

/// Whether settings reads may be answered from memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsCache {
    /// Cache in this process; only valid when no other writer exists.
    InProcess,
    /// Always read the store.
    Off,
}

/// Access to the settings row, cached when the store is not shared.
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn Store>,
    cache: Option<Cache<i32, Settings>>,
    // Held shared while filling the cache, exclusively while writing.
    fill: Arc<RwLock<()>>,
}

impl SettingsService {
    /// Create a new settings service over a store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, caching: SettingsCache) -> Self {
        let cache = (caching == SettingsCache::InProcess).then(|| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(SETTINGS_TTL)
                .build()
        });

        Self {
            store,
            cache,
            fill: Arc::new(RwLock::new(())),
        }
    }

    /// Current settings, or blank ones if none were ever saved. Never creates
    /// the row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store cannot be read.
    pub async fn read(&self) -> Result<Settings, RepositoryError> {
        let Some(cache) = &self.cache else {
            return Ok(self.store.load_settings().await?.unwrap_or_default());
        };

        if let Some(settings) = cache.get(&SETTINGS_KEY).await {
            debug!("Cache hit for settings");
            return Ok(settings);
        }

        let _fill = self.fill.read().await;
        let settings = self.store.load_settings().await?.unwrap_or_default();
        cache.insert(SETTINGS_KEY, settings.clone()).await;
        Ok(settings)
    }

    /// Create or fully overwrite the settings row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store write fails; the cache is then
    /// left untouched.
    pub async fn write(&self, settings: &Settings) -> Result<Settings, RepositoryError> {
        let _fill = self.fill.write().await;
        let saved = self.store.save_settings(settings).await?;
        if let Some(cache) = &self.cache {
            cache.insert(SETTINGS_KEY, saved.clone()).await;
        }
        Ok(saved)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, SettingsStore};

    fn settings(sector: &str, name_or_store: &str) -> Settings {
        Settings {
            sector: sector.to_owned(),
            name_or_store: name_or_store.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_read_before_write_is_blank_and_creates_nothing() {
        let store = Arc::new(MemoryStore::new());
        let service = SettingsService::new(store.clone(), SettingsCache::InProcess);
        assert_eq!(service.read().await.unwrap(), Settings::default());
        assert_eq!(store.load_settings().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_overwrites_cached_value() {
        let service = SettingsService::new(Arc::new(MemoryStore::new()), SettingsCache::InProcess);
        service.read().await.unwrap();

        service.write(&settings("A", "B")).await.unwrap();
        assert_eq!(service.read().await.unwrap(), settings("A", "B"));

        service.write(&settings("C", "")).await.unwrap();
        assert_eq!(service.read().await.unwrap(), settings("C", ""));
    }

    #[tokio::test]
    async fn test_uncached_read_sees_write_from_another_service() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let local = SettingsService::new(Arc::clone(&store), SettingsCache::Off);
        let peer = SettingsService::new(Arc::clone(&store), SettingsCache::Off);
        assert_eq!(local.read().await.unwrap(), Settings::default());

        peer.write(&settings("A", "B")).await.unwrap();
        assert_eq!(local.read().await.unwrap(), settings("A", "B"));
    }

    #[tokio::test]
    async fn test_cached_read_keeps_value_until_expiry() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let local = SettingsService::new(Arc::clone(&store), SettingsCache::InProcess);
        assert_eq!(local.read().await.unwrap(), Settings::default());

        store.save_settings(&settings("A", "B")).await.unwrap();
        assert_eq!(local.read().await.unwrap(), Settings::default());
    }
}
