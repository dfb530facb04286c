//! dbmigrate Core - domain model, naming convention and shared facilities
//!
//! This crate provides:
//! - The migration entry / ledger record model
//! - The `<YYYYMMDD>_<NNN>_<slug>.<ext>` naming convention
//! - The structured error facility (`ExError`, `MigrateError`)
//! - The structured logging facility and boundary macros
//! - The explicit `MigrateConfig` passed to every engine entry point

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod naming;

/// Re-exported so the logging macros resolve schema constants from any crate
pub use dbmigrate_core_types as core_types;

// Re-export commonly used types
pub use config::MigrateConfig;
pub use errors::{ExError, ExErrorKind, MigrateError};
pub use model::{MigrationEntry, MigrationKind, MigrationRecord, MigrationStatus};
pub use naming::DateBasis;
