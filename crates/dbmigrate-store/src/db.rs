//! Database connection management

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use dbmigrate_core::MigrateConfig;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(|e| from_rusqlite("open", e))
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(|e| from_rusqlite("open", e))
}

/// Open and configure the database named by `config`
pub fn open_configured(config: &MigrateConfig) -> Result<Connection> {
    let conn = open(&config.database_path)?;
    configure(&conn, config.busy_timeout())?;
    Ok(conn)
}

/// Configure a connection for migration runs
///
/// The busy timeout lets a second runner wait for the first one's
/// write lock instead of failing immediately.
pub fn configure(conn: &Connection, busy_timeout: Duration) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(|e| from_rusqlite("configure", e))?;

    conn.busy_timeout(busy_timeout)
        .map_err(|e| from_rusqlite("configure", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_enables_foreign_keys() {
        let conn = open_in_memory().unwrap();
        configure(&conn, Duration::from_millis(100)).unwrap();

        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
