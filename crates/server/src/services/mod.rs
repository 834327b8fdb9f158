//! Business services used by route handlers and the CLI.

pub mod auth;
pub mod seed;
pub mod settings;

pub use auth::{AuthError, AuthService, hash_password};
pub use seed::{SeedError, SeedFile, SeedReport, apply_seed};
pub use settings::{SettingsCache, SettingsService};
