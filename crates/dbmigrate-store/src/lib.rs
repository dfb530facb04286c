//! dbmigrate Store - SQLite persistence for the migration engine
//!
//! Provides:
//! - Connection open/configure helpers
//! - The `migrations` ledger table
//! - Directory listing of migration entries
//! - Compile-time registry of procedural migrations
//! - The per-migration transactional runner
//! - New migration file generation

pub mod db;
pub mod errors;
pub mod migrations;

// Re-export key types
pub use errors::Result;
pub use migrations::{
    create_new, run_all, status, NewMigrationOptions, NoopProgressReporter, ProceduralRegistry,
    ProgressReporter, RunReport,
};
