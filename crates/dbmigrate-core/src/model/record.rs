use chrono::NaiveDateTime;
use serde::Serialize;

use super::entry::MigrationKind;

/// Declared width of the ledger's `filename` column.
///
/// Names longer than this are rejected rather than truncated.
pub const FILENAME_WIDTH: usize = 120;

/// A ledger row: one migration that has been committed.
///
/// Rows are inserted exactly once, when the migration's transaction commits,
/// and are never updated or deleted by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationRecord {
    /// Surrogate key assigned by storage
    pub id: i64,
    pub filename: String,
    /// Commit time (UTC)
    pub migrated_at: NaiveDateTime,
}

/// A directory entry joined with its ledger state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub filename: String,
    pub kind: MigrationKind,
    /// `None` while the migration is pending
    pub applied_at: Option<NaiveDateTime>,
}

impl MigrationStatus {
    pub fn is_applied(&self) -> bool {
        self.applied_at.is_some()
    }
}
