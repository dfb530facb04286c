//! `new`: create the next migration file

#![allow(clippy::result_large_err)]

use dbmigrate_core::{log_op_end, log_op_error, log_op_start, MigrateConfig};
use dbmigrate_store::errors::Result;
use dbmigrate_store::migrations::{create_new, NewMigrationOptions};
use std::path::PathBuf;

/// Create an empty migration file in `config.migrations_dir`
///
/// Does not touch the database.
///
/// ## Errors
///
/// - `DirectoryNotFound`: migrations directory missing
/// - `InvalidInput`: name sanitises to nothing, or the filename is too long
/// - `FileExists` / `Io`: the file could not be created
pub fn new_migration(
    config: &MigrateConfig,
    name: &str,
    options: NewMigrationOptions,
) -> Result<PathBuf> {
    log_op_start!("new_migration", requested_name = name);
    let start = std::time::Instant::now();

    let path = create_new(&config.migrations_dir, name, options).map_err(|e| {
        log_op_error!(
            "new_migration",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "new_migration",
        duration_ms = start.elapsed().as_millis() as u64,
        path = %path.display()
    );

    Ok(path)
}
