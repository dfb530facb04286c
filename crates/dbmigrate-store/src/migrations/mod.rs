//! Migration framework
//!
//! Provides:
//! - The `migrations` ledger (schema, membership, recording)
//! - Directory listing and classification of entries
//! - Registry of procedural migrations compiled into the binary
//! - Per-migration transactional application in lexical order
//! - New migration file generation and status reporting

pub mod generator;
pub mod ledger;
pub mod procedural;
pub mod runner;
pub mod source;
pub mod status;

pub use generator::{create_new, create_new_on, NewMigrationOptions};
pub use procedural::{ProceduralFailure, ProceduralMigration, ProceduralRegistry};
pub use runner::{
    apply_entry, run_all, ApplyOutcome, NoopProgressReporter, ProgressReporter, RunReport,
};
pub use status::status;
