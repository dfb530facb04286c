//! New migration file generation

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use crate::migrations::source;
use chrono::NaiveDate;
use dbmigrate_core::errors::{ExError, MigrateError};
use dbmigrate_core::model::{MigrationKind, FILENAME_WIDTH};
use dbmigrate_core::naming::{
    compose_filename, format_datestamp, next_sequence, sanitize_slug, DateBasis,
};
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// How a new migration file is named
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewMigrationOptions {
    pub date_basis: DateBasis,
    pub kind: MigrationKind,
}

impl NewMigrationOptions {
    /// Statement-file migration dated in the given calendar
    pub fn new(date_basis: DateBasis) -> Self {
        Self {
            date_basis,
            kind: MigrationKind::Declarative,
        }
    }

    /// Switch to a script-file (procedural) migration
    pub fn procedural(mut self) -> Self {
        self.kind = MigrationKind::Procedural;
        self
    }
}

/// Create the next migration file for today's date
///
/// Returns the path of the new, empty file.
pub fn create_new(dir: &Path, requested_name: &str, options: NewMigrationOptions) -> Result<PathBuf> {
    create_new_on(dir, requested_name, options.kind, options.date_basis.today())
}

/// Create the next migration file for an explicit date
///
/// The sequence number is one past the highest sequence already used for
/// `date` in `dir` (any file counts, whatever its suffix), or 1.
///
/// # Errors
///
/// - `DirectoryNotFound` if `dir` is missing
/// - `InvalidInput` if the name sanitises to nothing or the resulting
///   filename does not fit the ledger column
/// - `FileExists` / `Io` if the file cannot be created
pub fn create_new_on(
    dir: &Path,
    requested_name: &str,
    kind: MigrationKind,
    date: NaiveDate,
) -> Result<PathBuf> {
    let slug = sanitize_slug(requested_name);
    if slug.is_empty() {
        return Err(MigrateError::InvalidName {
            reason: "name is empty".to_string(),
        }
        .into());
    }

    let datestamp = format_datestamp(date);
    let existing = source::list_names(dir)?;
    let sequence = next_sequence(existing.iter().map(String::as_str), &datestamp);
    let filename = compose_filename(&datestamp, sequence, &slug, kind);

    if filename.chars().count() > FILENAME_WIDTH {
        return Err(MigrateError::InvalidName {
            reason: format!(
                "{} is longer than the ledger's {} character limit",
                filename, FILENAME_WIDTH
            ),
        }
        .into());
    }

    let path = dir.join(&filename);
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => ExError::from(MigrateError::FileExists {
                path: path.display().to_string(),
            }),
            _ => io_error("create_new", e).with_filename(path.display().to_string()),
        })?;

    tracing::debug!(path = %path.display(), "Created migration file");

    Ok(path)
}
