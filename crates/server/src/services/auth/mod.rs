//! Authentication service.
//!
//! Email and password in, role out. No token or session is created; the
//! caller only learns which role the account carries.

mod error;

use std::sync::LazyLock;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use request_desk_core::{Credentials, Email, Role};

use crate::db::UserStore;

/// Hash checked when the email is unknown, so both failure paths cost one
/// Argon2 verification.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("request-desk-dummy-password").ok());

/// Authentication service.
pub struct AuthService<'a, U: UserStore + ?Sized> {
    users: &'a U,
}

impl<'a, U: UserStore + ?Sized> AuthService<'a, U> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a U) -> Self {
        Self { users }
    }

    /// Check a login attempt and return the account's role.
    ///
    /// Email lookup is exact and case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is malformed or
    /// unknown, or the password is wrong.
    pub async fn login(&self, credentials: &Credentials) -> Result<Role, AuthError> {
        let Ok(email) = Email::parse(&credentials.email) else {
            burn_verification(&credentials.password);
            return Err(AuthError::InvalidCredentials);
        };

        let Some(stored) = self.users.find_user_by_email(&email).await? else {
            tracing::debug!("login for unknown email");
            burn_verification(&credentials.password);
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(&credentials.password, &stored.password_hash)?;

        tracing::info!(user_id = %stored.user.id, role = %stored.user.role, "login succeeded");
        Ok(stored.user.role)
    }
}

/// Spend the same work as a real verification, discarding the result.
fn burn_verification(password: &str) {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, NewUser, OnConflict};

    async fn store_with_user() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .upsert_user(
                &NewUser {
                    email: Email::parse("responsavel@exemplo.com").unwrap(),
                    password_hash: hash_password("responsavel123").unwrap(),
                    role: Role::Responsavel,
                },
                OnConflict::Keep,
            )
            .await
            .unwrap();
        store
    }

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let a = hash_password("segredo").unwrap();
        let b = hash_password("segredo").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
        assert!(verify_password("segredo", &a).is_ok());
        assert!(verify_password("errado", &a).is_err());
    }

    #[tokio::test]
    async fn test_login_returns_role() {
        let store = store_with_user().await;
        let role = AuthService::new(&store)
            .login(&creds("responsavel@exemplo.com", "responsavel123"))
            .await
            .unwrap();
        assert_eq!(role, Role::Responsavel);
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let store = store_with_user().await;
        let auth = AuthService::new(&store);
        for attempt in [
            creds("responsavel@exemplo.com", "wrong"),
            creds("ninguem@exemplo.com", "responsavel123"),
            creds("Responsavel@exemplo.com", "responsavel123"),
            creds("not-an-email", "x"),
        ] {
            let err = auth.login(&attempt).await.unwrap_err();
            assert!(matches!(err, AuthError::InvalidCredentials));
            assert_eq!(err.to_string(), "invalid credentials");
        }
    }

    #[test]
    fn test_corrupt_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("x", "plaintext"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
