pub mod execute;
pub mod new;
pub mod status;

use dbmigrate_core::MigrateConfig;
use rusqlite::Connection;

/// Open the configured database, creating its parent directory if needed
pub(crate) fn connect(config: &MigrateConfig) -> Result<Connection, Box<dyn std::error::Error>> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(dbmigrate_store::db::open_configured(config)?)
}
