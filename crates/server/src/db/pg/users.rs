//! User queries. Only the seeding paths write here.

use async_trait::async_trait;

use request_desk_core::{Email, Role, User, UserId};

use super::{PgStore, map_unique_violation};
use crate::db::RepositoryError;
use crate::db::store::{NewUser, OnConflict, UpsertOutcome, UserCredentials, UserStore};

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    role: String,
    password_hash: String,
}

#[derive(Debug, sqlx::FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    row: UserRow,
    created: bool,
}

impl TryFrom<UserRow> for UserCredentials {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| RepositoryError::DataCorruption(format!("user {}: {e}", row.id)))?;

        Ok(Self {
            user: User {
                id: UserId::new(row.id),
                email,
                role,
            },
            password_hash: row.password_hash,
        })
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, role, password_hash FROM users WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn upsert_user(
        &self,
        user: &NewUser,
        on_conflict: OnConflict,
    ) -> Result<UpsertOutcome, RepositoryError> {
        let action = match on_conflict {
            OnConflict::Keep => "DO NOTHING",
            OnConflict::Overwrite => {
                "DO UPDATE SET role = EXCLUDED.role, \
                 password_hash = EXCLUDED.password_hash, updated_at = NOW()"
            }
        };

        // xmax is zero only for a freshly inserted tuple.
        let inserted: Option<UpsertRow> = sqlx::query_as(&format!(
            "INSERT INTO users (email, role, password_hash) VALUES ($1, $2, $3) \
             ON CONFLICT (email) {action} \
             RETURNING id, email, role, password_hash, (xmax = 0) AS created"
        ))
        .bind(user.email.as_str())
        .bind(user.role.to_string())
        .bind(&user.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "user"))?;

        if let Some(UpsertRow { row, created }) = inserted {
            let credentials = UserCredentials::try_from(row)?;
            return Ok(UpsertOutcome {
                user: credentials.user,
                created,
            });
        }

        // DO NOTHING returns no row for an existing email.
        let existing = self
            .find_user_by_email(&user.email)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        Ok(UpsertOutcome {
            user: existing.user,
            created: false,
        })
    }
}
