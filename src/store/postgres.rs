use anyhow::Context;
use sqlx::PgPool;

use super::{StoreError, UserStore};
use crate::domain::{NewUser, User, UserId};

/// A `UserStore` backed by the `users` table in Postgres.
///
/// Case-insensitive uniqueness is enforced by the unique index on
/// `LOWER(username)`.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    connection_pool: PgPool,
}

impl PgUserStore {
    pub fn new(connection_pool: PgPool) -> Self {
        Self { connection_pool }
    }

    pub fn connection_pool(&self) -> &PgPool {
        &self.connection_pool
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    #[tracing::instrument(name = "Get stored user", skip(self))]
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, password_salt
            FROM users
            WHERE LOWER(username) = LOWER($1)
            "#,
        )
        .bind(username)
        .fetch_optional(&self.connection_pool)
        .await
        .context("Failed to perform a query to retrieve a stored user.")
        .map_err(StoreError::Unavailable)
    }

    #[tracing::instrument(
        name = "Saving new user details in the database",
        skip(self, user),
        fields(username = %user.username)
    )]
    async fn insert(&self, user: NewUser) -> Result<UserId, StoreError> {
        let result = sqlx::query_scalar::<_, UserId>(
            r#"
            INSERT INTO users (username, password_hash, password_salt)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.password_salt)
        .fetch_one(&self.connection_pool)
        .await;

        match result {
            Ok(id) => Ok(id),
            // A concurrent registration won the race for this username
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(StoreError::Conflict),
            Err(e) => {
                tracing::error!("Failed to execute query: {:?}", e);
                Err(StoreError::Unavailable(
                    anyhow::Error::new(e).context("Failed to insert new user in the database."),
                ))
            }
        }
    }
}
