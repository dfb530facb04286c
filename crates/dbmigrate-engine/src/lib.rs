//! dbmigrate Engine - Orchestration layer
//!
//! Entry points the command surface calls. Each takes an explicit
//! `MigrateConfig` and owns the start/end/error boundary logging for its
//! operation.

pub mod commands;
