//! The `migrations` ledger table
//!
//! One row per migration whose effects have committed. Rows are only ever
//! inserted, inside the same transaction as the migration they record.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, ledger_write_error, schema_error, schema_failure, Result};
use chrono::NaiveDateTime;
use dbmigrate_core::errors::{ExError, ExErrorKind, MigrateError};
use dbmigrate_core::model::{MigrationRecord, FILENAME_WIDTH};
use rusqlite::{params, Connection, ErrorCode, TransactionBehavior};

/// Name of the ledger table
pub const LEDGER_TABLE: &str = "migrations";

/// Columns an existing ledger table must have
const LEDGER_COLUMNS: [&str; 3] = ["migration_id", "filename", "migrated_at"];

/// Storage format of `CURRENT_TIMESTAMP`
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CREATE_LEDGER_SQL: &str = "CREATE TABLE IF NOT EXISTS migrations (
    migration_id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename CHAR(120) NOT NULL UNIQUE,
    migrated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// Create the ledger table if it does not exist
///
/// Runs in its own immediate transaction, committed before returning, so it
/// is safe to call on every startup and from concurrent runners. An existing table is checked for the expected
/// columns; anything else named `migrations` is a schema error.
pub fn ensure_schema(conn: &mut Connection) -> Result<()> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|e| schema_failure("Failed to begin", e))?;

    tx.execute_batch(CREATE_LEDGER_SQL)
        .map_err(|e| schema_failure("Failed to create ledger table", e))?;

    verify_columns(&tx)?;

    tx.commit()
        .map_err(|e| schema_failure("Failed to commit ledger table", e))?;

    Ok(())
}

fn verify_columns(conn: &Connection) -> Result<()> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info('migrations')")
        .map_err(|e| schema_failure("Failed to inspect ledger table", e))?;
    let columns: Vec<String> = stmt
        .query_map([], |row| row.get(0))
        .and_then(|rows| rows.collect())
        .map_err(|e| schema_failure("Failed to inspect ledger table", e))?;

    let missing: Vec<&str> = LEDGER_COLUMNS
        .iter()
        .copied()
        .filter(|expected| !columns.iter().any(|c| c == expected))
        .collect();

    if !missing.is_empty() {
        return Err(schema_error(format!(
            "Table {} exists but lacks column(s): {}",
            LEDGER_TABLE,
            missing.join(", ")
        )));
    }

    Ok(())
}

/// Whether a ledger row exists for exactly this filename
///
/// Usable inside an open transaction (a `Transaction` derefs to
/// `Connection`); the runner calls it as the first statement of each
/// migration's transaction.
pub fn is_applied(conn: &Connection, filename: &str) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM migrations WHERE filename = ?1)",
        [filename],
        |row| row.get(0),
    )
    .map_err(|e| from_rusqlite("is_applied", e).with_filename(filename))
}

/// Record a migration as applied, stamped with the current time
///
/// Fails with `DuplicateRecord` on a uniqueness violation and `LedgerWrite`
/// for anything else, including names wider than the ledger column.
pub fn record(conn: &Connection, filename: &str) -> Result<()> {
    let len = filename.chars().count();
    if len > FILENAME_WIDTH {
        return Err(MigrateError::FilenameTooLong {
            filename: filename.to_string(),
            len,
            max: FILENAME_WIDTH,
        }
        .into());
    }

    match conn.execute(
        "INSERT INTO migrations (filename) VALUES (?1)",
        params![filename],
    ) {
        Ok(_) => {
            tracing::debug!(filename = %filename, "Recorded migration in ledger");
            Ok(())
        }
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Err(MigrateError::DuplicateRecord {
                filename: filename.to_string(),
            }
            .into())
        }
        Err(e) => Err(ledger_write_error(filename, e)),
    }
}

/// All ledger rows, oldest first
pub fn applied_records(conn: &Connection) -> Result<Vec<MigrationRecord>> {
    let mut stmt = conn
        .prepare("SELECT migration_id, filename, migrated_at FROM migrations ORDER BY migration_id")
        .map_err(|e| from_rusqlite("applied_records", e))?;

    let rows: Vec<(i64, String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .and_then(|rows| rows.collect())
        .map_err(|e| from_rusqlite("applied_records", e))?;

    rows.into_iter()
        .map(|(id, filename, migrated_at)| {
            let migrated_at = NaiveDateTime::parse_from_str(&migrated_at, TIMESTAMP_FORMAT)
                .map_err(|e| {
                    ExError::new(ExErrorKind::Serialization)
                        .with_op("applied_records")
                        .with_filename(filename.clone())
                        .with_message(format!("Unreadable migrated_at {:?}: {}", migrated_at, e))
                })?;
            Ok(MigrationRecord {
                id,
                filename,
                migrated_at,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_db() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_schema(&mut conn).unwrap();
        conn
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let mut conn = ledger_db();
        ensure_schema(&mut conn).unwrap();
        ensure_schema(&mut conn).unwrap();
    }

    #[test]
    fn test_ensure_schema_rejects_foreign_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE migrations (id INTEGER PRIMARY KEY, name TEXT)")
            .unwrap();

        let err = ensure_schema(&mut conn).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Schema);
        assert!(err.message().contains("filename"));
    }

    #[test]
    fn test_record_then_is_applied() {
        let conn = ledger_db();
        assert!(!is_applied(&conn, "20240101_001_init.sql").unwrap());

        record(&conn, "20240101_001_init.sql").unwrap();

        assert!(is_applied(&conn, "20240101_001_init.sql").unwrap());
        assert!(!is_applied(&conn, "20240101_001_init.rs").unwrap());
    }

    #[test]
    fn test_record_twice_is_duplicate() {
        let conn = ledger_db();
        record(&conn, "20240101_001_init.sql").unwrap();

        let err = record(&conn, "20240101_001_init.sql").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::DuplicateRecord);
    }

    #[test]
    fn test_record_rejects_names_wider_than_column() {
        let conn = ledger_db();
        let name = format!("20240101_001_{}.sql", "x".repeat(FILENAME_WIDTH));

        let err = record(&conn, &name).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::LedgerWrite);
        assert!(!is_applied(&conn, &name).unwrap());
    }

    #[test]
    fn test_applied_records_in_insertion_order() {
        let conn = ledger_db();
        record(&conn, "20240102_001_b.sql").unwrap();
        record(&conn, "20240101_001_a.sql").unwrap();

        let records = applied_records(&conn).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["20240102_001_b.sql", "20240101_001_a.sql"]);
        assert!(records[0].id < records[1].id);
    }
}
