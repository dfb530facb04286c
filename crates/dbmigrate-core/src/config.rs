//! Explicit runtime configuration
//!
//! The engine never looks anything up ambiently; callers build a
//! `MigrateConfig` (the CLI does so from flags and environment) and pass it
//! to every entry point.

use std::path::PathBuf;
use std::time::Duration;

/// Default SQLite database location, relative to the working directory
pub const DEFAULT_DATABASE_PATH: &str = ".dbmigrate/store.db";

/// Default migrations directory, relative to the working directory
pub const DEFAULT_MIGRATIONS_DIR: &str = "database/migrations";

/// Default time to wait on a locked database before failing
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateConfig {
    /// SQLite database file holding both the schema and the ledger
    pub database_path: PathBuf,
    /// Directory scanned for migration entries
    pub migrations_dir: PathBuf,
    /// How long a runner waits for another writer (e.g. a concurrent run)
    pub busy_timeout_ms: u64,
}

impl MigrateConfig {
    pub fn new(database_path: impl Into<PathBuf>, migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            migrations_dir: migrations_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_busy_timeout_ms(mut self, busy_timeout_ms: u64) -> Self {
        self.busy_timeout_ms = busy_timeout_ms;
        self
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            migrations_dir: PathBuf::from(DEFAULT_MIGRATIONS_DIR),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}
