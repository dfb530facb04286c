pub mod entry;
pub mod record;

pub use entry::{MigrationEntry, MigrationKind};
pub use record::{MigrationRecord, MigrationStatus, FILENAME_WIDTH};
