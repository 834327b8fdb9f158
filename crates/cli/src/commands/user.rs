//! User account management.
//!
//! ```bash
//! request-desk-cli user create -e ana@exemplo.com -p 's3cret' -r solicitante
//! ```
//!
//! Creating an account that already exists replaces its password and role.
//! The password is trimmed, as the login endpoint trims what it receives.

use thiserror::Error;

use request_desk_core::{Email, EmailError, Role};
use request_desk_server::db::{NewUser, OnConflict, PgStore, RepositoryError, UserStore};
use request_desk_server::services::{AuthError, hash_password};

use super::{CommandError, connect};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Invalid role.
    #[error(
        "Invalid role: {0}. Valid roles: solicitante, responsavel, solicitante_ti, responsavel_ti"
    )]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Empty password.
    #[error("Password must not be empty")]
    EmptyPassword,

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] AuthError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Create or overwrite one account.
///
/// # Errors
///
/// Returns an error if an argument is invalid or the database write fails.
pub async fn create(email: &str, password: &str, role: &str) -> Result<(), UserError> {
    let role: Role = role
        .parse()
        .map_err(|_| UserError::InvalidRole(role.to_owned()))?;
    let email = Email::parse(email)?;
    if password.trim().is_empty() {
        return Err(UserError::EmptyPassword);
    }

    let user = NewUser {
        email,
        password_hash: hash_password(password.trim())?,
        role,
    };

    let store = PgStore::new(connect().await?);
    let outcome = store.upsert_user(&user, OnConflict::Overwrite).await?;

    if outcome.created {
        tracing::info!(
            "User created successfully! ID: {}, Email: {}, Role: {}",
            outcome.user.id,
            outcome.user.email,
            outcome.user.role
        );
    } else {
        tracing::warn!(
            "User {} already existed; password and role were replaced",
            outcome.user.email
        );
    }
    Ok(())
}
