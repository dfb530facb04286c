//! Status command
//!
//! Usage: dbmigrate status [--json]

use clap::Args;
use dbmigrate_core::MigrateConfig;

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(config: &MigrateConfig, args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = super::connect(config)?;
    let rows = dbmigrate_engine::commands::migration_status(&mut conn, config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in &rows {
        match row.applied_at {
            Some(at) => println!("applied  {}  {}", at.format("%Y-%m-%d %H:%M:%S"), row.filename),
            None => println!("pending  {:19}  {}", "-", row.filename),
        }
    }
    let pending = rows.iter().filter(|r| !r.is_applied()).count();
    println!("{} applied, {} pending", rows.len() - pending, pending);

    Ok(())
}
