//! Execute command
//!
//! Usage: dbmigrate execute

use dbmigrate_core::model::MigrationEntry;
use dbmigrate_core::MigrateConfig;
use dbmigrate_store::migrations::{ProceduralRegistry, ProgressReporter, RunReport};

/// Prints each migration name as it starts, then `Done.`
struct StdoutReporter;

impl ProgressReporter for StdoutReporter {
    fn migration_started(&self, entry: &MigrationEntry) {
        println!("{}", entry.name);
    }

    fn placeholder_recorded(&self, entry: &MigrationEntry) {
        eprintln!(
            "note: {} has no registered procedural migration; recorded without running",
            entry.name
        );
    }

    fn run_finished(&self, _report: &RunReport) {
        println!("Done.");
    }
}

pub fn execute(
    config: &MigrateConfig,
    registry: &ProceduralRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = super::connect(config)?;

    dbmigrate_engine::commands::execute(&mut conn, config, registry, &StdoutReporter)?;

    Ok(())
}
