//! Listing of migration entries in the migrations directory

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use dbmigrate_core::errors::MigrateError;
use dbmigrate_core::model::{MigrationEntry, MigrationKind};
use std::fs;
use std::path::Path;

/// Names starting with this are never migration candidates
pub const HIDDEN_PREFIX: char = '.';

/// List candidate migrations in `dir`, sorted by name (byte-wise, ascending)
///
/// Non-recursive. Skips anything that is not a regular file (symlinks are
/// followed), hidden names, names that are not valid UTF-8, and files with
/// neither the statement nor the script suffix. Skipping is silent: unrelated
/// files may live beside the migrations.
pub fn list_entries(dir: &Path) -> Result<Vec<MigrationEntry>> {
    let read_dir = open_dir(dir)?;
    let mut entries = Vec::new();

    for dirent in read_dir {
        let dirent = dirent.map_err(|e| io_error("list_entries", e))?;

        let name = match dirent.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                tracing::debug!(name = ?raw, "Skipping non UTF-8 entry");
                continue;
            }
        };

        if name.starts_with(HIDDEN_PREFIX) {
            continue;
        }

        let path = dirent.path();
        if !fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false) {
            continue;
        }

        match MigrationKind::from_filename(&name) {
            Some(kind) => entries.push(MigrationEntry::new(name, path, kind)),
            None => tracing::debug!(filename = %name, "Skipping unrecognised entry"),
        }
    }

    entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));

    tracing::debug!(
        directory = %dir.display(),
        count = entries.len(),
        "Listed migration entries"
    );

    Ok(entries)
}

/// Names of every file in `dir`, whatever its suffix, unsorted (used for
/// numbering). Subdirectories are not counted.
pub fn list_names(dir: &Path) -> Result<Vec<String>> {
    let read_dir = open_dir(dir)?;
    let mut names = Vec::new();

    for dirent in read_dir {
        let dirent = dirent.map_err(|e| io_error("list_names", e))?;
        if fs::metadata(dirent.path()).map_or(true, |m| m.is_dir()) {
            continue;
        }
        if let Ok(name) = dirent.file_name().into_string() {
            names.push(name);
        }
    }

    Ok(names)
}

fn open_dir(dir: &Path) -> Result<fs::ReadDir> {
    let not_found = || -> dbmigrate_core::ExError {
        MigrateError::DirectoryNotFound {
            path: dir.display().to_string(),
        }
        .into()
    };

    if !dir.is_dir() {
        return Err(not_found());
    }

    fs::read_dir(dir).map_err(|e| {
        tracing::debug!(directory = %dir.display(), error = %e, "Migrations directory unreadable");
        not_found()
    })
}
