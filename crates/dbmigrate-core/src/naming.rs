//! Migration filename convention
//!
//! Files are named `<YYYYMMDD>_<NNN>_<slug>.<ext>`. Both numeric fields are
//! fixed-width, zero-padded ASCII digits, so plain byte-wise ordering of the
//! names is chronological-then-sequence ordering. The runner depends on
//! this: it applies entries in lexical order and nothing else.

use chrono::{Local, NaiveDate, Utc};

use crate::model::MigrationKind;

/// Number of digits in a datestamp
pub const DATESTAMP_WIDTH: usize = 8;

/// Minimum number of digits in a sequence number
pub const SEQUENCE_WIDTH: usize = 3;

/// Which calendar "today" is computed in for new filenames.
///
/// Deliberately has no `Default`: callers must pick one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBasis {
    Utc,
    Local,
}

impl DateBasis {
    /// Today's date in this calendar
    pub fn today(&self) -> NaiveDate {
        match self {
            DateBasis::Utc => Utc::now().date_naive(),
            DateBasis::Local => Local::now().date_naive(),
        }
    }
}

/// The numeric prefix of a conventionally named migration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedName<'a> {
    pub datestamp: &'a str,
    pub sequence: u32,
}

/// Render a date as an 8-digit datestamp
pub fn format_datestamp(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Render a sequence number, zero-padded to three digits.
///
/// Values of 1000 and up widen instead of being truncated.
pub fn format_sequence(sequence: u32) -> String {
    format!("{:0width$}", sequence, width = SEQUENCE_WIDTH)
}

/// Split a filename into its datestamp and sequence number.
///
/// Returns `None` for names that do not follow the convention; such files
/// are simply not considered when numbering.
pub fn parse_filename(name: &str) -> Option<ParsedName<'_>> {
    let (datestamp, after_date) = name.split_once('_')?;
    if datestamp.len() != DATESTAMP_WIDTH || !datestamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let (sequence, _slug) = after_date.split_once('_')?;
    if sequence.len() < SEQUENCE_WIDTH || !sequence.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(ParsedName {
        datestamp,
        sequence: sequence.parse().ok()?,
    })
}

/// Next sequence number for `datestamp`, given the names already present.
///
/// One more than the highest sequence recorded under that datestamp, or 1
/// when there is none.
pub fn next_sequence<'a, I>(existing: I, datestamp: &str) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    existing
        .into_iter()
        .filter_map(parse_filename)
        .filter(|parsed| parsed.datestamp == datestamp)
        .map(|parsed| parsed.sequence)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Replace every character that is not an ASCII letter, digit or
/// underscore with an underscore.
pub fn sanitize_slug(requested: &str) -> String {
    requested
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Compose `<datestamp>_<sequence>_<slug>.<suffix>`
pub fn compose_filename(datestamp: &str, sequence: u32, slug: &str, kind: MigrationKind) -> String {
    format!(
        "{}_{}_{}.{}",
        datestamp,
        format_sequence(sequence),
        slug,
        kind.suffix()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_conventional_name() {
        let parsed = parse_filename("20240131_007_add_users.sql").unwrap();
        assert_eq!(parsed.datestamp, "20240131");
        assert_eq!(parsed.sequence, 7);
    }

    #[test]
    fn test_parse_rejects_nonconforming_names() {
        assert!(parse_filename("readme.txt").is_none());
        assert!(parse_filename("2024013_001_short_date.sql").is_none());
        assert!(parse_filename("2024O131_001_letter_o.sql").is_none());
        assert!(parse_filename("20240131_01_short_seq.sql").is_none());
        assert!(parse_filename("20240131_001.sql").is_none());
    }

    #[test]
    fn test_parse_accepts_widened_sequence() {
        let parsed = parse_filename("20240131_1000_many.sql").unwrap();
        assert_eq!(parsed.sequence, 1000);
    }

    #[test]
    fn test_next_sequence_same_day() {
        let names = [
            "20240131_001_a.sql",
            "20240131_002_b.rs",
            "20240130_009_c.sql",
        ];
        assert_eq!(next_sequence(names, "20240131"), 3);
    }

    #[test]
    fn test_next_sequence_new_day_restarts() {
        let names = ["20240131_001_a.sql", "20240131_002_b.sql"];
        assert_eq!(next_sequence(names, "20240201"), 1);
    }

    #[test]
    fn test_next_sequence_ignores_unrelated_files() {
        let names = ["notes.md", ".gitkeep", "20240131_004_d.sql"];
        assert_eq!(next_sequence(names, "20240131"), 5);
    }

    #[test]
    fn test_format_sequence_pads_and_widens() {
        assert_eq!(format_sequence(1), "001");
        assert_eq!(format_sequence(42), "042");
        assert_eq!(format_sequence(999), "999");
        assert_eq!(format_sequence(1000), "1000");
    }

    #[test]
    fn test_sanitize_slug() {
        assert_eq!(sanitize_slug("add user's table!"), "add_user_s_table_");
        assert_eq!(sanitize_slug("already_fine_42"), "already_fine_42");
        assert_eq!(sanitize_slug("über-table"), "_ber_table");
    }

    #[test]
    fn test_compose_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let name = compose_filename(
            &format_datestamp(date),
            3,
            "add_index",
            MigrationKind::Declarative,
        );
        assert_eq!(name, "20240305_003_add_index.sql");

        let name = compose_filename("20240305", 12, "backfill", MigrationKind::Procedural);
        assert_eq!(name, "20240305_012_backfill.rs");
    }
}
