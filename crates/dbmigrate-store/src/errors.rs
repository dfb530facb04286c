//! Error handling for dbmigrate-store
//!
//! Wraps the core ExError with store-specific helpers. Helpers that start
//! from a rusqlite or IO error keep it as the `source()` of the result.

use dbmigrate_core::errors::{ExError, ExErrorKind, MigrateError};
use std::error::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op(op.to_string())
        .with_message(err.to_string())
        .with_source(err)
}

/// Create an IO error
pub fn io_error(op: &str, err: std::io::Error) -> ExError {
    ExError::from(MigrateError::Io {
        op: op.to_string(),
        reason: err.to_string(),
    })
    .with_source(err)
}

/// Create a ledger schema error
pub fn schema_error(reason: impl Into<String>) -> ExError {
    MigrateError::Schema {
        reason: reason.into(),
    }
    .into()
}

/// Create a ledger schema error caused by a failed statement
pub fn schema_failure(context: &str, err: rusqlite::Error) -> ExError {
    schema_error(format!("{}: {}", context, err)).with_source(err)
}

/// Create a statement failure for a declarative migration
pub fn statement_error(filename: &str, err: rusqlite::Error) -> ExError {
    ExError::from(MigrateError::Statement {
        filename: filename.to_string(),
        reason: err.to_string(),
    })
    .with_source(err)
}

/// Create a failure for a procedural migration
pub fn procedural_error(filename: &str, err: Box<dyn Error + Send + Sync + 'static>) -> ExError {
    ExError::from(MigrateError::Procedural {
        filename: filename.to_string(),
        reason: err.to_string(),
    })
    .with_source(err)
}

/// Create a ledger write failure
pub fn ledger_write_error(filename: &str, err: rusqlite::Error) -> ExError {
    ExError::from(MigrateError::LedgerWrite {
        filename: filename.to_string(),
        reason: err.to_string(),
    })
    .with_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_error_keeps_sqlite_cause() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let cause = conn.execute_batch("SELEC 1").unwrap_err();

        let err = statement_error("20240101_001_typo.sql", cause);

        assert_eq!(err.kind(), ExErrorKind::Statement);
        let source = err.source().expect("cause should be attached");
        assert!(source.downcast_ref::<rusqlite::Error>().is_some());
        assert!(source.to_string().contains("syntax error"));
    }

    #[test]
    fn test_procedural_error_keeps_callback_failure() {
        let failure: Box<dyn Error + Send + Sync> = "backfill found orphan rows".into();

        let err = procedural_error("20240101_002_backfill.rs", failure);

        assert_eq!(err.kind(), ExErrorKind::Procedural);
        assert_eq!(
            err.source().map(|e| e.to_string()),
            Some("backfill found orphan rows".to_string())
        );
    }

    #[test]
    fn test_io_error_keeps_io_cause() {
        let err = io_error("read_migration", std::io::Error::other("permission denied"));

        assert_eq!(err.kind(), ExErrorKind::Io);
        let source = err.source().expect("cause should be attached");
        assert!(source.downcast_ref::<std::io::Error>().is_some());
    }
}
