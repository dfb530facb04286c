//! dbmigrate CLI
//!
//! Ships with no procedural migrations registered; `.rs` migration files
//! are recorded as placeholders. Applications with procedural migrations
//! build their own binary around `dbmigrate_cli::run`.

use clap::Parser;
use dbmigrate_cli::Cli;
use dbmigrate_store::migrations::ProceduralRegistry;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = dbmigrate_cli::run(cli, &ProceduralRegistry::new()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
