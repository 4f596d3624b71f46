use async_trait::async_trait;
use log::{error, info};

use super::{MigrationError, MigrationScript, MigrationSource};

/// Persistence used by [`MigrationRunner`] to execute scripts and remember
/// which ones already ran.
#[async_trait]
pub trait MigrationStore: Send + Sync {
    /// Create the bookkeeping table if it does not exist yet.
    async fn ensure_bookkeeping_table(&self) -> Result<(), MigrationError>;

    async fn is_applied(&self, filename: &str) -> Result<bool, MigrationError>;

    /// Run the script body as-is. Multi-statement scripts are allowed.
    async fn execute(&self, script: &MigrationScript) -> Result<(), MigrationError>;

    /// Mark a script as applied. Called only after [`MigrationStore::execute`] succeeded.
    async fn record(&self, filename: &str) -> Result<(), MigrationError>;
}

/// Outcome of a successful run, filenames in execution order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

pub struct MigrationRunner<S> {
    store: S,
}

impl<S: MigrationStore> MigrationRunner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Apply every pending script from `source` in filename order.
    ///
    /// Stops at the first failing script; scripts before it stay applied and
    /// recorded, the failing one and everything after it stay pending.
    pub async fn run(&self, source: &MigrationSource) -> Result<MigrationReport, MigrationError> {
        let scripts = source.load()?;
        info!("Found {} migration script(s) in {}", scripts.len(), source);

        self.store.ensure_bookkeeping_table().await?;

        let mut report = MigrationReport::default();
        for script in &scripts {
            if self.store.is_applied(&script.filename).await? {
                info!("Migration {} already executed, skipping", script.filename);
                report.skipped.push(script.filename.clone());
                continue;
            }

            info!("Running migration: {}", script.filename);
            if let Err(e) = self.store.execute(script).await {
                error!("Migration {} failed: {}", script.filename, e);
                return Err(e);
            }
            self.store.record(&script.filename).await?;
            info!("Migration {} completed successfully", script.filename);

            report.applied.push(script.filename.clone());
        }

        info!(
            "Migrations finished: {} applied, {} already up to date",
            report.applied.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}
