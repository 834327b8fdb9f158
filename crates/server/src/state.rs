//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::Store;
use crate::services::{AuthService, SettingsCache, SettingsService};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn Store>,
    settings: SettingsService,
}

impl AppState {
    /// Create a new application state over a store.
    ///
    /// Use [`SettingsCache::Off`] when other processes write the same store.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, settings_cache: SettingsCache) -> Self {
        let settings = SettingsService::new(Arc::clone(&store), settings_cache);
        Self {
            inner: Arc::new(AppStateInner { store, settings }),
        }
    }

    /// The entity store.
    #[must_use]
    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    /// The settings singleton.
    #[must_use]
    pub fn settings(&self) -> &SettingsService {
        &self.inner.settings
    }

    /// An auth service borrowing this state's user store.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_, dyn Store> {
        AuthService::new(self.inner.store.as_ref())
    }
}
