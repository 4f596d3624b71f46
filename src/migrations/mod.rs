//! Ordered, idempotent schema migrations.
//!
//! Scripts are `.sql` files applied in byte-wise filename order. Each applied
//! filename is recorded in the `schema_migrations` bookkeeping table and is
//! never executed again against the same database. A failing script aborts
//! the run and stays unrecorded, so it is retried on the next start.

mod postgres;
mod runner;
mod source;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use postgres::PgMigrationStore;
pub use runner::{MigrationRunner, MigrationStore};
pub use source::{MigrationScript, MigrationSource};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to list migrations in {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read migration {filename}: {source}")]
    ReadScript {
        filename: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to {operation}: {source}")]
    Bookkeeping {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("migration {filename} failed: {source}")]
    Execute {
        filename: String,
        #[source]
        source: sqlx::Error,
    },
}
