//! Procedural migrations compiled into the binary
//!
//! A procedural migration is a `.rs` file in the migrations directory plus
//! an entry in a `ProceduralRegistry` keyed by that exact filename. The file
//! fixes the migration's place in the order; the registered code is what
//! runs. A `.rs` file with nothing registered under its name is an inert
//! placeholder and is still recorded as applied.
//!
//! ```
//! use dbmigrate_store::migrations::procedural::{ProceduralFailure, ProceduralRegistry};
//! use rusqlite::Connection;
//!
//! fn backfill_emails(conn: &Connection) -> Result<(), ProceduralFailure> {
//!     conn.execute("UPDATE users SET email = lower(email)", [])?;
//!     Ok(())
//! }
//!
//! let mut registry = ProceduralRegistry::new();
//! registry.register("20240301_001_backfill_emails.rs", backfill_emails).unwrap();
//! assert!(registry.get("20240301_001_backfill_emails.rs").is_some());
//! ```

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use dbmigrate_core::errors::MigrateError;
use rusqlite::Connection;
use std::collections::BTreeMap;

/// Error returned by procedural migration code
pub type ProceduralFailure = Box<dyn std::error::Error + Send + Sync>;

/// Entry point of a procedural migration
///
/// Receives the connection with the migration's transaction already open.
/// Nested work should use `SAVEPOINT`; issuing `BEGIN`/`COMMIT` directly
/// breaks the runner's transaction.
pub trait ProceduralMigration: Send + Sync {
    fn migrate(&self, conn: &Connection) -> std::result::Result<(), ProceduralFailure>;
}

impl<F> ProceduralMigration for F
where
    F: Fn(&Connection) -> std::result::Result<(), ProceduralFailure> + Send + Sync,
{
    fn migrate(&self, conn: &Connection) -> std::result::Result<(), ProceduralFailure> {
        self(conn)
    }
}

/// Procedural migrations keyed by filename
#[derive(Default)]
pub struct ProceduralRegistry {
    migrations: BTreeMap<String, Box<dyn ProceduralMigration>>,
}

impl ProceduralRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `migration` under `filename`
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the filename is already registered.
    pub fn register<M>(&mut self, filename: impl Into<String>, migration: M) -> Result<()>
    where
        M: ProceduralMigration + 'static,
    {
        let filename = filename.into();
        if self.migrations.contains_key(&filename) {
            return Err(MigrateError::DuplicateRegistration { filename }.into());
        }
        self.migrations.insert(filename, Box::new(migration));
        Ok(())
    }

    /// Builder form of [`register`](Self::register)
    pub fn with<M>(mut self, filename: impl Into<String>, migration: M) -> Result<Self>
    where
        M: ProceduralMigration + 'static,
    {
        self.register(filename, migration)?;
        Ok(self)
    }

    pub fn get(&self, filename: &str) -> Option<&dyn ProceduralMigration> {
        self.migrations.get(filename).map(|m| m.as_ref())
    }
}

impl std::fmt::Debug for ProceduralRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.migrations.keys()).finish()
    }
}
