use async_trait::async_trait;
use log::debug;
use sqlx::PgPool;

use super::{MigrationError, MigrationScript, MigrationStore};

/// [`MigrationStore`] backed by the `schema_migrations` table.
pub struct PgMigrationStore {
    pool: PgPool,
}

impl PgMigrationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn bookkeeping(operation: &'static str) -> impl FnOnce(sqlx::Error) -> MigrationError {
    move |source| MigrationError::Bookkeeping { operation, source }
}

#[async_trait]
impl MigrationStore for PgMigrationStore {
    async fn ensure_bookkeeping_table(&self) -> Result<(), MigrationError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                id SERIAL PRIMARY KEY,
                filename VARCHAR(255) NOT NULL UNIQUE,
                executed_at TIMESTAMP WITH TIME ZONE DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(bookkeeping("create schema_migrations table"))?;

        Ok(())
    }

    async fn is_applied(&self, filename: &str) -> Result<bool, MigrationError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations WHERE filename = $1")
                .bind(filename)
                .fetch_one(&self.pool)
                .await
                .map_err(bookkeeping("check migration status"))?;

        Ok(count > 0)
    }

    async fn execute(&self, script: &MigrationScript) -> Result<(), MigrationError> {
        debug!("Executing {} ({} bytes)", script.filename, script.sql.len());

        sqlx::raw_sql(&script.sql)
            .execute(&self.pool)
            .await
            .map_err(|source| MigrationError::Execute {
                filename: script.filename.clone(),
                source,
            })?;

        Ok(())
    }

    async fn record(&self, filename: &str) -> Result<(), MigrationError> {
        sqlx::query("INSERT INTO schema_migrations (filename) VALUES ($1)")
            .bind(filename)
            .execute(&self.pool)
            .await
            .map_err(bookkeeping("record migration"))?;

        Ok(())
    }
}
