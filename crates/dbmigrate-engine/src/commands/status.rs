//! `status`: applied and pending migrations

#![allow(clippy::result_large_err)]

use dbmigrate_core::model::MigrationStatus;
use dbmigrate_core::{log_op_end, log_op_error, log_op_start, MigrateConfig};
use dbmigrate_store::errors::Result;
use dbmigrate_store::migrations::status;
use rusqlite::Connection;

/// List every migration entry with its ledger state
pub fn migration_status(
    conn: &mut Connection,
    config: &MigrateConfig,
) -> Result<Vec<MigrationStatus>> {
    log_op_start!("migration_status");
    let start = std::time::Instant::now();

    let rows = status(conn, &config.migrations_dir).map_err(|e| {
        log_op_error!(
            "migration_status",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "migration_status",
        duration_ms = start.elapsed().as_millis() as u64,
        pending_count = rows.iter().filter(|r| !r.is_applied()).count() as u64
    );

    Ok(rows)
}
