//! Command orchestration layer.
//!
//! ## Logging Ownership
//!
//! Commands here emit `log_op_start!` / `log_op_end!` / `log_op_error!`.
//! The store layer below only uses `tracing::debug!()`.

pub mod execute;
pub mod new;
pub mod status;

pub use execute::execute;
pub use new::new_migration;
pub use status::migration_status;
