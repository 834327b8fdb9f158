//! YAML seed: initial user accounts and the settings row.
//!
//! ```yaml
//! users:
//!   - email: solicitante@exemplo.com
//!     password: solicitante123
//!     role: solicitante
//! settings:
//!   sector: ""
//!   nameOrStore: ""
//! ```
//!
//! Existing users and an existing settings row are left as they are, so a
//! seed can be re-applied safely.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use request_desk_core::{Email, EmailError, Role, Settings};

use super::auth::{AuthError, hash_password};
use crate::db::{NewUser, OnConflict, RepositoryError, Store};

/// Errors that can occur while applying a seed.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid email {email:?}: {source}")]
    Email {
        email: String,
        source: EmailError,
    },
    #[error("invalid role for {email}: {role}")]
    Role { email: String, role: String },
    #[error("password for {0} is empty")]
    EmptyPassword(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Seed file contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    /// Initial settings; blank when omitted.
    #[serde(default)]
    pub settings: Option<Settings>,
}

/// One account, with its password in clear (hashed before it is stored).
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
    pub role: String,
}

/// What a seed run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users_created: usize,
    pub users_existing: usize,
    pub settings_created: bool,
}

impl SeedFile {
    /// Parse a seed from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Yaml` if the text does not match the format.
    pub fn from_yaml(text: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read and parse a seed file.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Io` or `SeedError::Yaml`.
    pub async fn load(path: &Path) -> Result<Self, SeedError> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_yaml(&text)
    }
}

impl SeedUser {
    /// Validate and hash into a storable user.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` for a malformed email, unknown role, empty
    /// password, or a hashing failure.
    pub fn into_new_user(self) -> Result<NewUser, SeedError> {
        let email = Email::parse(&self.email).map_err(|source| SeedError::Email {
            email: self.email.clone(),
            source,
        })?;
        let role = self.role.parse::<Role>().map_err(|_| SeedError::Role {
            email: self.email.clone(),
            role: self.role.clone(),
        })?;
        if self.password.trim().is_empty() {
            return Err(SeedError::EmptyPassword(self.email));
        }

        Ok(NewUser {
            email,
            password_hash: hash_password(self.password.trim())?,
            role,
        })
    }
}

/// Apply a seed: create missing users and the settings row if absent.
///
/// # Errors
///
/// Stops at the first invalid user or store failure.
pub async fn apply_seed(store: &dyn Store, seed: SeedFile) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    for user in seed.users {
        let new_user = user.into_new_user()?;
        let outcome = store.upsert_user(&new_user, OnConflict::Keep).await?;
        if outcome.created {
            info!(email = %outcome.user.email, role = %outcome.user.role, "seeded user");
            report.users_created += 1;
        } else {
            report.users_existing += 1;
        }
    }

    report.settings_created = store
        .init_settings(&seed.settings.unwrap_or_default())
        .await?;

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, SettingsStore, UserStore};

    const SEED: &str = r#"
users:
  - email: solicitante@exemplo.com
    password: solicitante123
    role: solicitante
  - email: responsavel.ti@exemplo.com
    password: resti123
    role: responsavel_ti
"#;

    #[tokio::test]
    async fn test_apply_seed_is_idempotent() {
        let store = MemoryStore::new();
        let seed = SeedFile::from_yaml(SEED).unwrap();

        let first = apply_seed(&store, seed.clone()).await.unwrap();
        assert_eq!(first.users_created, 2);
        assert!(first.settings_created);

        let second = apply_seed(&store, seed).await.unwrap();
        assert_eq!(second.users_created, 0);
        assert_eq!(second.users_existing, 2);
        assert!(!second.settings_created);

        let stored = store
            .find_user_by_email(&Email::parse("responsavel.ti@exemplo.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.user.role, Role::ResponsavelTi);
        assert_ne!(stored.password_hash, "resti123");
        assert_eq!(store.load_settings().await.unwrap(), Some(Settings::default()));
    }

    #[test]
    fn test_seed_rejects_bad_role() {
        let user = SeedUser {
            email: "a@b.c".to_owned(),
            password: "x".to_owned(),
            role: "admin".to_owned(),
        };
        assert!(matches!(user.into_new_user(), Err(SeedError::Role { .. })));
    }

    #[test]
    fn test_seed_settings_use_camel_case() {
        let seed = SeedFile::from_yaml("settings:\n  sector: Loja\n  nameOrStore: Centro\n").unwrap();
        assert!(seed.users.is_empty());
        assert_eq!(seed.settings.unwrap().name_or_store, "Centro");
    }

    #[test]
    fn test_default_seed_keeps_dev_credentials() {
        let seed = SeedFile::from_yaml(include_str!("../../../../seed/default.yaml")).unwrap();
        let passwords: Vec<(&str, &str)> = seed
            .users
            .iter()
            .map(|u| (u.email.as_str(), u.password.as_str()))
            .collect();
        assert_eq!(
            passwords,
            [
                ("solicitante@exemplo.com", "solicitante123"),
                ("responsavel@exemplo.com", "responsavel123"),
                ("solicitante.ti@exemplo.com", "solti123"),
                ("responsavel.ti@exemplo.com", "resti123"),
            ]
        );
    }
}
