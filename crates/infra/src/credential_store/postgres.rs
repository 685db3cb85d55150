//! Postgres-backed credential store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use estate_auth::{NewUser, Role, User};
use estate_core::UserId;

use super::r#trait::CredentialStore;
use crate::store::{StoreError, map_sqlx_error};

/// Users table adapter. Email uniqueness is enforced by the `users_email_key`
/// constraint, so concurrent registrations race safely in the database.
#[derive(Debug, Clone)]
pub struct PostgresCredentialStore {
    pool: Arc<PgPool>,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for UserRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role: row.try_get("role")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("stored user row: {e}")))?;
        Ok(User {
            id: UserId::from_uuid(row.id),
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
        })
    }
}

fn decode(operation: &str, row: PgRow) -> Result<User, StoreError> {
    UserRow::from_row(&row)
        .map_err(|e| map_sqlx_error(operation, e))?
        .try_into()
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    #[instrument(skip(self, user), fields(role = %user.role), err)]
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, role, created_at
            "#,
        )
        .bind(*UserId::new().as_uuid())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(Utc::now())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_user", e))?;

        decode("create_user", row)
    }

    #[instrument(skip(self, email), err)]
    async fn find_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_user_by_email", e))?
        .ok_or_else(|| StoreError::NotFound("user".to_string()))?;

        decode("find_user_by_email", row)
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn find_user_by_id(&self, id: UserId) -> Result<User, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, email, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_user_by_id", e))?
        .ok_or_else(|| StoreError::NotFound("user".to_string()))?;

        decode("find_user_by_id", row)
    }
}
