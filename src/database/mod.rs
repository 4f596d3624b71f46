//! PostgreSQL connection pool.

use std::str::FromStr;

use log::info;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Connection options built from the database section of the config.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let ssl_mode = PgSslMode::from_str(&config.sslmode)?;

    Ok(PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.dbname)
        .ssl_mode(ssl_mode))
}

/// Open the pool and verify the database answers before returning it.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!(
        "Connecting to PostgreSQL at {}:{}/{}...",
        config.host, config.port, config.dbname
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect_with(connect_options(config)?)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;
    info!("Connected to PostgreSQL successfully!");

    Ok(pool)
}
