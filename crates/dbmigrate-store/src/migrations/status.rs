//! Applied/pending view of the migrations directory

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use crate::migrations::{ledger, source};
use dbmigrate_core::model::MigrationStatus;
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;

/// Every entry in `dir`, in application order, with its ledger timestamp
///
/// Creates the ledger table if needed but applies nothing.
pub fn status(conn: &mut Connection, dir: &Path) -> Result<Vec<MigrationStatus>> {
    ledger::ensure_schema(conn)?;

    let entries = source::list_entries(dir)?;
    let applied: HashMap<String, _> = ledger::applied_records(conn)?
        .into_iter()
        .map(|r| (r.filename, r.migrated_at))
        .collect();

    Ok(entries
        .into_iter()
        .map(|entry| MigrationStatus {
            applied_at: applied.get(&entry.name).copied(),
            filename: entry.name,
            kind: entry.kind,
        })
        .collect())
}
