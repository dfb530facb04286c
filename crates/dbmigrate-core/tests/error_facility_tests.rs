use dbmigrate_core::errors::{ExError, ExErrorKind, MigrateError};

#[test]
fn test_directory_not_found_verifiable_by_kind() {
    let err = MigrateError::DirectoryNotFound {
        path: "/srv/app/database/migrations".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::DirectoryNotFound);
    assert_eq!(ex_err.code(), "ERR_DIRECTORY_NOT_FOUND");
    assert_eq!(ex_err.filename(), Some("/srv/app/database/migrations"));
}

#[test]
fn test_statement_error_carries_filename_and_reason() {
    let err = MigrateError::Statement {
        filename: "20240101_002_bad.sql".to_string(),
        reason: "no such table: missing".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::Statement);
    assert_eq!(ex_err.op(), Some("apply_statements"));
    assert_eq!(ex_err.filename(), Some("20240101_002_bad.sql"));
    assert!(ex_err.message().contains("no such table"));
}

#[test]
fn test_procedural_distinct_from_statement() {
    let ex_err: ExError = MigrateError::Procedural {
        filename: "20240101_003_backfill.rs".to_string(),
        reason: "boom".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::Procedural);
    assert_ne!(ex_err.kind(), ExErrorKind::Statement);
    assert!(ex_err.kind().is_migration_failure());
}

#[test]
fn test_duplicate_record_structured_fields() {
    let ex_err: ExError = MigrateError::DuplicateRecord {
        filename: "20240101_001_init.sql".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::DuplicateRecord);
    assert_eq!(ex_err.code(), "ERR_DUPLICATE_RECORD");
    assert_eq!(ex_err.op(), Some("record"));
}

#[test]
fn test_invalid_name_is_invalid_input() {
    let ex_err: ExError = MigrateError::InvalidName {
        reason: "name is empty".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidInput);
    assert!(ex_err.message().contains("name is empty"));
}

#[test]
fn test_domain_error_display() {
    let err = MigrateError::FileExists {
        path: "database/migrations/20240101_001_init.sql".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Migration file already exists: database/migrations/20240101_001_init.sql"
    );
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::Schema, "ERR_SCHEMA"),
        (ExErrorKind::DirectoryNotFound, "ERR_DIRECTORY_NOT_FOUND"),
        (ExErrorKind::Statement, "ERR_STATEMENT"),
        (ExErrorKind::Procedural, "ERR_PROCEDURAL"),
        (ExErrorKind::LedgerWrite, "ERR_LEDGER_WRITE"),
        (ExErrorKind::DuplicateRecord, "ERR_DUPLICATE_RECORD"),
        (ExErrorKind::FileExists, "ERR_FILE_EXISTS"),
        (ExErrorKind::Io, "ERR_IO"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
    }
}
