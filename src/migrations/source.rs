use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use super::MigrationError;

const MIGRATION_SUFFIX: &str = ".sql";

/// Scripts compiled into the binary, used when no directory is configured.
const EMBEDDED_SCRIPTS: &[(&str, &str)] = &[
    (
        "001_create_users_table.sql",
        include_str!("../../migrations/001_create_users_table.sql"),
    ),
    (
        "002_add_users_created_at_index.sql",
        include_str!("../../migrations/002_add_users_created_at_index.sql"),
    ),
];

/// One schema-change script, identified by its filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationScript {
    pub filename: String,
    pub sql: String,
}

impl MigrationScript {
    pub fn new(filename: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            sql: sql.into(),
        }
    }
}

/// Where migration scripts come from.
#[derive(Debug, Clone)]
pub enum MigrationSource {
    /// Every `.sql` file directly inside the directory.
    Directory(PathBuf),
    /// A fixed set of scripts held in memory.
    Embedded(Vec<MigrationScript>),
}

impl MigrationSource {
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        MigrationSource::Directory(path.into())
    }

    /// The scripts shipped with this binary.
    pub fn embedded() -> Self {
        MigrationSource::Embedded(
            EMBEDDED_SCRIPTS
                .iter()
                .map(|(filename, sql)| MigrationScript::new(*filename, *sql))
                .collect(),
        )
    }

    /// Read every script and sort by filename.
    ///
    /// All reading happens here, before any statement is sent to the store.
    pub fn load(&self) -> Result<Vec<MigrationScript>, MigrationError> {
        let mut scripts = match self {
            MigrationSource::Directory(dir) => read_directory(dir)?,
            MigrationSource::Embedded(scripts) => scripts
                .iter()
                .filter(|s| is_migration_file(&s.filename))
                .cloned()
                .collect(),
        };

        scripts.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(scripts)
    }
}

impl fmt::Display for MigrationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationSource::Directory(dir) => write!(f, "{}", dir.display()),
            MigrationSource::Embedded(_) => write!(f, "embedded scripts"),
        }
    }
}

fn is_migration_file(filename: &str) -> bool {
    filename.ends_with(MIGRATION_SUFFIX)
}

fn read_directory(dir: &Path) -> Result<Vec<MigrationScript>, MigrationError> {
    let read_dir_error = |source| MigrationError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut scripts = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        if path.is_dir() {
            continue;
        }

        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            warn!("Skipping migration with non UTF-8 name: {}", path.display());
            continue;
        };
        if !is_migration_file(filename) {
            continue;
        }

        let sql = fs::read_to_string(&path).map_err(|source| MigrationError::ReadScript {
            filename: filename.to_string(),
            source,
        })?;
        scripts.push(MigrationScript::new(filename, sql));
    }

    Ok(scripts)
}
