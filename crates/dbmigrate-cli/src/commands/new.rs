//! New migration command
//!
//! Usage: dbmigrate new <NAME> [--utc] [--procedural]

use clap::Args;
use dbmigrate_core::naming::DateBasis;
use dbmigrate_core::MigrateConfig;
use dbmigrate_store::migrations::NewMigrationOptions;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Migration name; characters other than letters, digits and `_` become `_`
    pub name: String,

    /// Date the file in UTC instead of the local calendar
    #[arg(long)]
    pub utc: bool,

    /// Create a procedural (`.rs`) migration instead of a statement (`.sql`) one
    #[arg(long)]
    pub procedural: bool,
}

impl NewArgs {
    fn options(&self) -> NewMigrationOptions {
        let basis = if self.utc {
            DateBasis::Utc
        } else {
            DateBasis::Local
        };
        let options = NewMigrationOptions::new(basis);
        if self.procedural {
            options.procedural()
        } else {
            options
        }
    }
}

pub fn execute(config: &MigrateConfig, args: NewArgs) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(&config.migrations_dir)?;

    let path = dbmigrate_engine::commands::new_migration(config, &args.name, args.options())?;
    println!("{}", path.display());

    Ok(())
}
