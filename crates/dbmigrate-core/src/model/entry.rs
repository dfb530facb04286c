use serde::Serialize;
use std::path::PathBuf;

/// File suffix of declarative (statement text) migrations
pub const STATEMENT_SUFFIX: &str = "sql";

/// File suffix of procedural migrations
pub const SCRIPT_SUFFIX: &str = "rs";

/// How a migration entry takes effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationKind {
    /// Raw statement text, executed verbatim
    Declarative,
    /// Code registered against the filename, given the open connection
    Procedural,
}

impl MigrationKind {
    /// Classify a file name by its suffix.
    ///
    /// Returns `None` for names carrying neither recognised suffix; those are
    /// unrelated files and are skipped, not rejected.
    pub fn from_filename(name: &str) -> Option<Self> {
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        match ext {
            STATEMENT_SUFFIX => Some(MigrationKind::Declarative),
            SCRIPT_SUFFIX => Some(MigrationKind::Procedural),
            _ => None,
        }
    }

    /// The suffix (without the dot) files of this kind carry
    pub fn suffix(&self) -> &'static str {
        match self {
            MigrationKind::Declarative => STATEMENT_SUFFIX,
            MigrationKind::Procedural => SCRIPT_SUFFIX,
        }
    }
}

impl std::fmt::Display for MigrationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationKind::Declarative => f.write_str("declarative"),
            MigrationKind::Procedural => f.write_str("procedural"),
        }
    }
}

/// A candidate migration discovered in the migrations directory.
///
/// Entries are recomputed from the directory on every run and never
/// persisted; only their `name` reaches the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationEntry {
    /// File base name, also the ledger key
    pub name: String,
    /// Resolved location of the file
    pub path: PathBuf,
    pub kind: MigrationKind,
}

impl MigrationEntry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, kind: MigrationKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
        }
    }
}
