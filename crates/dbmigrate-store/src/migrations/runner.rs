//! Migration runner
//!
//! Applies every pending entry of the migrations directory, in lexical
//! order, each in its own transaction together with its ledger row.
//!
//! Each transaction is opened with `BEGIN IMMEDIATE`, so the write lock is
//! held before the ledger is consulted. A second runner against the same
//! database waits at `BEGIN` (up to the connection's busy timeout) and then
//! sees the first runner's row, which keeps check-then-record sound across
//! processes.

#![allow(clippy::result_large_err)]

use crate::errors::{
    from_rusqlite, io_error, ledger_write_error, procedural_error, statement_error, Result,
};
use crate::migrations::ledger;
use crate::migrations::procedural::ProceduralRegistry;
use crate::migrations::source;
use dbmigrate_core::model::{MigrationEntry, MigrationKind};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Observer for run progress
pub trait ProgressReporter {
    /// Called once a migration is known to be new, before it is applied
    fn migration_started(&self, entry: &MigrationEntry);

    /// Called when a `.rs` entry with no registered code has been recorded
    /// without running anything
    fn placeholder_recorded(&self, _entry: &MigrationEntry) {}

    /// Called after the last entry has been processed successfully
    fn run_finished(&self, _report: &RunReport) {}
}

/// Reporter that ignores all progress
pub struct NoopProgressReporter;

impl ProgressReporter for NoopProgressReporter {
    fn migration_started(&self, _entry: &MigrationEntry) {}
}

/// What a successful run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Newly applied filenames, in application order
    pub applied: Vec<String>,
    /// Filenames already present in the ledger
    pub skipped: Vec<String>,
    /// Subset of `applied`: procedural entries recorded with nothing registered
    pub placeholders: Vec<String>,
}

/// Result of processing one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// Recorded, but no procedural code was registered under the name
    Placeholder,
    Skipped,
}

/// Apply all pending migrations in `dir`
///
/// Ensures the ledger exists, lists the directory, then processes entries
/// one by one. The first failure rolls back that entry's transaction and
/// ends the run; later entries are not attempted. Entries committed before
/// the failure stay committed.
pub fn run_all(
    conn: &mut Connection,
    dir: &Path,
    registry: &ProceduralRegistry,
    reporter: &dyn ProgressReporter,
) -> Result<RunReport> {
    ledger::ensure_schema(conn)?;

    let entries = source::list_entries(dir)?;
    let mut report = RunReport::default();

    for entry in &entries {
        match apply_entry(conn, entry, registry, reporter)? {
            ApplyOutcome::Applied => report.applied.push(entry.name.clone()),
            ApplyOutcome::Placeholder => {
                report.applied.push(entry.name.clone());
                report.placeholders.push(entry.name.clone());
            }
            ApplyOutcome::Skipped => report.skipped.push(entry.name.clone()),
        }
    }

    reporter.run_finished(&report);

    Ok(report)
}

/// Apply a single entry if the ledger has no row for it
///
/// The ledger check, the entry's effects and the ledger insert share one
/// transaction. Any error drops the transaction, which rolls it back.
pub fn apply_entry(
    conn: &mut Connection,
    entry: &MigrationEntry,
    registry: &ProceduralRegistry,
    reporter: &dyn ProgressReporter,
) -> Result<ApplyOutcome> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| from_rusqlite("begin", e).with_filename(&entry.name))?;

    if ledger::is_applied(&tx, &entry.name)? {
        tx.rollback()
            .map_err(|e| from_rusqlite("rollback", e).with_filename(&entry.name))?;
        tracing::debug!(filename = %entry.name, "Migration already applied, skipping");
        return Ok(ApplyOutcome::Skipped);
    }

    reporter.migration_started(entry);

    let outcome = match entry.kind {
        MigrationKind::Declarative => {
            apply_statements(&tx, entry)?;
            ApplyOutcome::Applied
        }
        MigrationKind::Procedural => apply_procedural(&tx, entry, registry)?,
    };

    ledger::record(&tx, &entry.name)?;

    tx.commit().map_err(|e| ledger_write_error(&entry.name, e))?;

    if outcome == ApplyOutcome::Placeholder {
        reporter.placeholder_recorded(entry);
    }

    tracing::debug!(
        filename = %entry.name,
        migration_kind = %entry.kind,
        "Migration applied"
    );

    Ok(outcome)
}

/// Execute the file's text verbatim; it may hold several statements
fn apply_statements(tx: &Transaction<'_>, entry: &MigrationEntry) -> Result<()> {
    let sql = fs::read_to_string(&entry.path)
        .map_err(|e| io_error("read_migration", e).with_filename(&entry.name))?;

    tx.execute_batch(&sql)
        .map_err(|e| statement_error(&entry.name, e))
}

/// Run the registered entry point, if any; an unregistered file is a no-op
fn apply_procedural(
    tx: &Transaction<'_>,
    entry: &MigrationEntry,
    registry: &ProceduralRegistry,
) -> Result<ApplyOutcome> {
    match registry.get(&entry.name) {
        Some(migration) => {
            migration
                .migrate(tx)
                .map_err(|e| procedural_error(&entry.name, e))?;
            Ok(ApplyOutcome::Applied)
        }
        None => {
            tracing::debug!(
                filename = %entry.name,
                "No entry point registered, recording placeholder"
            );
            Ok(ApplyOutcome::Placeholder)
        }
    }
}
