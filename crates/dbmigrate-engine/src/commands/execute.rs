//! `execute`: apply every pending migration

#![allow(clippy::result_large_err)]

use dbmigrate_core::model::MigrationEntry;
use dbmigrate_core::{log_op_end, log_op_error, log_op_start, MigrateConfig};
use dbmigrate_store::errors::Result;
use dbmigrate_store::migrations::{run_all, ProceduralRegistry, ProgressReporter, RunReport};
use rusqlite::Connection;

/// Apply all pending migrations from `config.migrations_dir`
///
/// ## Errors
///
/// - `Schema`: ledger table could not be created or verified
/// - `DirectoryNotFound`: migrations directory missing or unreadable
/// - `Statement` / `Procedural`: a migration failed (rolled back, run stopped)
/// - `LedgerWrite` / `DuplicateRecord`: recording failed (rolled back, run stopped)
pub fn execute(
    conn: &mut Connection,
    config: &MigrateConfig,
    registry: &ProceduralRegistry,
    reporter: &dyn ProgressReporter,
) -> Result<RunReport> {
    let directory = config.migrations_dir.display().to_string();
    log_op_start!("execute", directory = %directory);
    let start = std::time::Instant::now();

    let reporter = PlaceholderWarning { inner: reporter };
    let report = run_all(conn, &config.migrations_dir, registry, &reporter).map_err(|e| {
        log_op_error!(
            "execute",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            filename = e.filename().unwrap_or_default()
        );
        e
    })?;

    log_op_end!(
        "execute",
        duration_ms = start.elapsed().as_millis() as u64,
        applied_count = report.applied.len() as u64,
        skipped_count = report.skipped.len() as u64,
        placeholder_count = report.placeholders.len() as u64
    );

    Ok(report)
}

/// Forwards progress, warning about `.rs` entries recorded with no
/// registered code (they will never run, even once code is registered)
struct PlaceholderWarning<'a> {
    inner: &'a dyn ProgressReporter,
}

impl ProgressReporter for PlaceholderWarning<'_> {
    fn migration_started(&self, entry: &MigrationEntry) {
        self.inner.migration_started(entry);
    }

    fn placeholder_recorded(&self, entry: &MigrationEntry) {
        tracing::warn!(
            op = "execute",
            filename = %entry.name,
            "No procedural migration registered; recorded as applied without running"
        );
        self.inner.placeholder_recorded(entry);
    }

    fn run_finished(&self, report: &RunReport) {
        self.inner.run_finished(report);
    }
}
