// Engine commands: behaviour plus boundary logging

use dbmigrate_core::core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use dbmigrate_core::logging_facility::test_capture::init_test_capture;
use dbmigrate_core::naming::DateBasis;
use dbmigrate_core::{ExErrorKind, MigrateConfig};
use dbmigrate_engine::commands::{execute, migration_status, new_migration};
use dbmigrate_store::migrations::{NewMigrationOptions, NoopProgressReporter, ProceduralRegistry};
use rusqlite::Connection;
use tracing::Level;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, MigrateConfig, Connection) {
    let temp_dir = TempDir::new().unwrap();
    let migrations = temp_dir.path().join("migrations");
    fs::create_dir(&migrations).unwrap();
    let config = MigrateConfig::new(temp_dir.path().join("store.db"), migrations);
    let conn = Connection::open(&config.database_path).unwrap();
    (temp_dir, config, conn)
}

#[test]
fn test_execute_logs_start_and_end_with_counts() {
    let capture = init_test_capture();
    let (_temp_dir, config, mut conn) = setup();
    fs::write(
        config.migrations_dir.join("20240101_001_a.sql"),
        "CREATE TABLE a (id INTEGER);",
    )
    .unwrap();

    let report = execute(
        &mut conn,
        &config,
        &ProceduralRegistry::new(),
        &NoopProgressReporter,
    )
    .unwrap();
    assert_eq!(report.applied, vec!["20240101_001_a.sql"]);

    let directory = config.migrations_dir.display().to_string();
    let events = capture.events_for_op("execute");

    assert!(events.iter().any(|e| {
        e.event.as_deref() == Some(EVENT_START) && e.field("directory") == Some(directory.as_str())
    }));
    assert!(events.iter().any(|e| {
        e.event.as_deref() == Some(EVENT_END) && e.field("applied_count") == Some("1")
    }));
}

#[test]
fn test_execute_failure_logs_error_code_and_filename() {
    let capture = init_test_capture();
    let (_temp_dir, config, mut conn) = setup();
    fs::write(
        config.migrations_dir.join("20240101_001_engine_broken_unique.sql"),
        "CREATE TABLE ok (id INTEGER); SELEC 1;",
    )
    .unwrap();

    let err = execute(
        &mut conn,
        &config,
        &ProceduralRegistry::new(),
        &NoopProgressReporter,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Statement);

    let error_event = capture
        .events_for_op("execute")
        .into_iter()
        .find(|e| {
            e.event.as_deref() == Some(EVENT_END_ERROR)
                && e.filename.as_deref() == Some("20240101_001_engine_broken_unique.sql")
        })
        .expect("Should have error event for the broken migration");

    assert_eq!(error_event.field("err_code"), Some("ERR_STATEMENT"));
}

#[test]
fn test_new_migration_then_execute_records_it() {
    let (_temp_dir, config, mut conn) = setup();

    let path = new_migration(
        &config,
        "add widgets",
        NewMigrationOptions::new(DateBasis::Local),
    )
    .unwrap();
    assert!(path.starts_with(&config.migrations_dir));
    fs::write(&path, "CREATE TABLE widgets (id INTEGER PRIMARY KEY);").unwrap();

    let rows = migration_status(&mut conn, &config).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(!rows[0].is_applied());

    execute(
        &mut conn,
        &config,
        &ProceduralRegistry::new(),
        &NoopProgressReporter,
    )
    .unwrap();

    let rows = migration_status(&mut conn, &config).unwrap();
    assert!(rows[0].is_applied());
    assert!(rows[0].filename.ends_with("_001_add_widgets.sql"));
}

#[test]
fn test_new_migration_in_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let config = MigrateConfig::new(
        temp_dir.path().join("store.db"),
        temp_dir.path().join("absent"),
    );

    let err = new_migration(&config, "x", NewMigrationOptions::new(DateBasis::Utc)).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::DirectoryNotFound);
}

#[test]
fn test_execute_warns_about_unregistered_procedural_file() {
    let capture = init_test_capture();
    let (_temp_dir, config, mut conn) = setup();
    let filename = "20240101_001_warn_unregistered.rs";
    fs::write(config.migrations_dir.join(filename), "// backfill\n").unwrap();

    let report = execute(
        &mut conn,
        &config,
        &ProceduralRegistry::new(),
        &NoopProgressReporter,
    )
    .unwrap();
    assert_eq!(report.placeholders, vec![filename]);

    let warnings = capture.count_events(|e| {
        e.level == Level::WARN
            && e.op.as_deref() == Some("execute")
            && e.filename.as_deref() == Some(filename)
    });
    assert_eq!(warnings, 1);
}
