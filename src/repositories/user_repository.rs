//! User repository for all PostgreSQL operations related to users.
//!
//! Every call is bounded by the configured query timeout. When the bound is
//! exceeded the in-flight query future is dropped, which cancels it, and a
//! [`RepositoryError::Timeout`] is returned.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use sqlx::PgPool;
use tokio::time::timeout;

use crate::models::User;
use crate::repositories::{RepositoryError, RepositoryResult};
use crate::utils::mask_email;

/// Data-access contract for user rows.
///
/// Writes take explicit field values; resolving partial updates is the
/// service layer's job.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return the stored row with its assigned id and timestamps.
    async fn create(&self, name: &str, email: &str, password_hash: &str)
        -> RepositoryResult<User>;

    /// Find a user by id, or [`RepositoryError::NotFound`].
    async fn find_by_id(&self, id: i64) -> RepositoryResult<User>;

    /// Find a user by exact email, or [`RepositoryError::NotFound`].
    async fn find_by_email(&self, email: &str) -> RepositoryResult<User>;

    /// Fetch one page of users ordered by id.
    async fn find_all(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<User>>;

    /// Overwrite name, email and password hash; bumps `updated_at`.
    async fn update(
        &self,
        id: i64,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> RepositoryResult<User>;

    /// Hard-delete a user. Deleting an absent id is [`RepositoryError::NotFound`].
    async fn delete(&self, id: i64) -> RepositoryResult<()>;

    /// Total number of users, independent of pagination.
    async fn count(&self) -> RepositoryResult<i64>;
}

/// PostgreSQL-backed [`UserRepository`].
pub struct PgUserRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgUserRepository {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn bounded<T, F>(&self, operation: &'static str, query: F) -> RepositoryResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(|e| RepositoryError::from_sqlx(operation, e)),
            Err(_) => {
                warn!(
                    "Repository: {} exceeded {:?}, cancelled",
                    operation, self.query_timeout
                );
                Err(RepositoryError::Timeout {
                    operation,
                    timeout: self.query_timeout,
                })
            }
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> RepositoryResult<User> {
        debug!("Repository: Creating user with email: {}", mask_email(email));
        let now = Utc::now();

        self.bounded(
            "create user",
            sqlx::query_as::<_, User>(
                r#"
                INSERT INTO users (name, email, password_hash, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $4)
                RETURNING id, name, email, password_hash, created_at, updated_at
                "#,
            )
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(now)
            .fetch_one(&self.pool),
        )
        .await
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<User> {
        debug!("Repository: Finding user by ID: {}", id);

        self.bounded(
            "get user by id",
            sqlx::query_as::<_, User>(
                "SELECT id, name, email, password_hash, created_at, updated_at \
                 FROM users WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("user with id {}", id)))
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<User> {
        debug!("Repository: Finding user by email: {}", mask_email(email));

        self.bounded(
            "get user by email",
            sqlx::query_as::<_, User>(
                "SELECT id, name, email, password_hash, created_at, updated_at \
                 FROM users WHERE email = $1",
            )
            .bind(email)
            .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("user with email {}", mask_email(email))))
    }

    async fn find_all(&self, limit: i64, offset: i64) -> RepositoryResult<Vec<User>> {
        debug!(
            "Repository: Listing users with limit {} offset {}",
            limit, offset
        );

        self.bounded(
            "list users",
            sqlx::query_as::<_, User>(
                "SELECT id, name, email, password_hash, created_at, updated_at \
                 FROM users ORDER BY id LIMIT $1 OFFSET $2",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool),
        )
        .await
    }

    async fn update(
        &self,
        id: i64,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> RepositoryResult<User> {
        debug!("Repository: Updating user: {}", id);

        self.bounded(
            "update user",
            sqlx::query_as::<_, User>(
                r#"
                UPDATE users
                SET name = $2, email = $3, password_hash = $4, updated_at = $5
                WHERE id = $1
                RETURNING id, name, email, password_hash, created_at, updated_at
                "#,
            )
            .bind(id)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(Utc::now())
            .fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| RepositoryError::NotFound(format!("user with id {}", id)))
    }

    async fn delete(&self, id: i64) -> RepositoryResult<()> {
        debug!("Repository: Deleting user: {}", id);

        let result = self
            .bounded(
                "delete user",
                sqlx::query("DELETE FROM users WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user with id {}", id)));
        }

        Ok(())
    }

    async fn count(&self) -> RepositoryResult<i64> {
        self.bounded(
            "count users",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users").fetch_one(&self.pool),
        )
        .await
    }
}
