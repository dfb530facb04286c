//! dbmigrate command surface
//!
//! `execute`, `new` and `status`, wired to the engine. Exposed as a library
//! so an application can register its procedural migrations and reuse the
//! same commands:
//!
//! ```no_run
//! use clap::Parser;
//! use dbmigrate_store::migrations::{ProceduralFailure, ProceduralRegistry};
//! use rusqlite::Connection;
//!
//! fn backfill(conn: &Connection) -> Result<(), ProceduralFailure> {
//!     conn.execute("UPDATE users SET active = 1", [])?;
//!     Ok(())
//! }
//!
//! let registry = ProceduralRegistry::new()
//!     .with("20240301_001_backfill.rs", backfill)
//!     .unwrap();
//! dbmigrate_cli::run(dbmigrate_cli::Cli::parse(), &registry).unwrap();
//! ```

use clap::{Parser, Subcommand};
use dbmigrate_core::config::{
    DEFAULT_BUSY_TIMEOUT_MS, DEFAULT_DATABASE_PATH, DEFAULT_MIGRATIONS_DIR,
};
use dbmigrate_core::logging_facility::{self, Profile};
use dbmigrate_core::MigrateConfig;
use dbmigrate_store::migrations::ProceduralRegistry;
use std::path::PathBuf;

pub mod commands;

#[derive(Debug, Parser)]
#[command(name = "dbmigrate")]
#[command(about = "dbmigrate - Apply and create SQLite migrations", long_about = None)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "DBMIGRATE_DB", default_value = DEFAULT_DATABASE_PATH)]
    pub db: PathBuf,

    /// Directory holding migration files
    #[arg(long, global = true, env = "DBMIGRATE_DIR", default_value = DEFAULT_MIGRATIONS_DIR)]
    pub dir: PathBuf,

    /// Milliseconds to wait for another writer before failing
    #[arg(
        long,
        global = true,
        env = "DBMIGRATE_BUSY_TIMEOUT_MS",
        default_value_t = DEFAULT_BUSY_TIMEOUT_MS
    )]
    pub busy_timeout_ms: u64,

    /// Emit JSON logs on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config(&self) -> MigrateConfig {
        MigrateConfig::new(&self.db, &self.dir).with_busy_timeout_ms(self.busy_timeout_ms)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply all pending migrations
    Execute,
    /// Create a new, empty migration file
    New(commands::new::NewArgs),
    /// Show applied and pending migrations
    Status(commands::status::StatusArgs),
}

/// Run a parsed command line against `registry`
pub fn run(cli: Cli, registry: &ProceduralRegistry) -> Result<(), Box<dyn std::error::Error>> {
    logging_facility::init(if cli.log_json {
        Profile::Production
    } else {
        Profile::Development
    });

    let config = cli.config();

    match cli.command {
        Commands::Execute => commands::execute::execute(&config, registry),
        Commands::New(args) => commands::new::execute(&config, args),
        Commands::Status(args) => commands::status::execute(&config, args),
    }
}
