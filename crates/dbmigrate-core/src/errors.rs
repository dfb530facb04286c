use std::sync::Arc;
use thiserror::Error;

/// Underlying cause carried by an `ExError`
pub type ErrorCause = Arc<dyn std::error::Error + Send + Sync + 'static>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure a migration run or file generation can surface maps to one
/// of these kinds. Each kind has a stable code usable by callers, tests and
/// log consumers without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Run preconditions (fatal before any migration is attempted)
    Schema,
    DirectoryNotFound,

    // Per-migration failures (roll back the migration, abort the run)
    Statement,
    Procedural,
    LedgerWrite,
    DuplicateRecord,

    // File generation
    FileExists,
    InvalidInput,

    // Integration/IO
    Io,
    Persistence,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Schema => "ERR_SCHEMA",
            ExErrorKind::DirectoryNotFound => "ERR_DIRECTORY_NOT_FOUND",
            ExErrorKind::Statement => "ERR_STATEMENT",
            ExErrorKind::Procedural => "ERR_PROCEDURAL",
            ExErrorKind::LedgerWrite => "ERR_LEDGER_WRITE",
            ExErrorKind::DuplicateRecord => "ERR_DUPLICATE_RECORD",
            ExErrorKind::FileExists => "ERR_FILE_EXISTS",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether a failure of this kind happened inside a migration's own
    /// transaction (and therefore rolled that migration back).
    pub fn is_migration_failure(&self) -> bool {
        matches!(
            self,
            ExErrorKind::Statement
                | ExErrorKind::Procedural
                | ExErrorKind::LedgerWrite
                | ExErrorKind::DuplicateRecord
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus the
/// operation, the migration filename or path involved, and a human message.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    filename: Option<String>,
    message: String,
    source: Option<ErrorCause>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            filename: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add migration filename (or path) context
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach the underlying cause (a rusqlite or IO error, a procedural
    /// migration's own failure)
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        self.source = Some(Arc::from(source.into()));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the filename context, if any
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(filename) = &self.filename {
            write!(f, " (filename: {})", filename)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for migration operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrateError {
    // ===== Run preconditions =====
    /// The ledger table could not be created or has an unexpected shape
    #[error("Ledger schema error: {reason}")]
    Schema { reason: String },

    /// The migrations directory is missing or not a directory
    #[error("Migrations directory not found: {path}")]
    DirectoryNotFound { path: String },

    // ===== Per-migration failures =====
    /// A declarative migration's statements failed
    #[error("Statement migration {filename} failed: {reason}")]
    Statement { filename: String, reason: String },

    /// A procedural migration's entry point failed
    #[error("Procedural migration {filename} failed: {reason}")]
    Procedural { filename: String, reason: String },

    /// Recording a completed migration in the ledger failed
    #[error("Failed to record migration {filename}: {reason}")]
    LedgerWrite { filename: String, reason: String },

    /// The ledger already holds a row for this filename
    #[error("Migration already recorded: {filename}")]
    DuplicateRecord { filename: String },

    /// Filename does not fit the ledger's fixed-width column
    #[error("Migration filename {filename} is {len} characters, ledger width is {max}")]
    FilenameTooLong {
        filename: String,
        len: usize,
        max: usize,
    },

    // ===== File generation =====
    /// Target migration file already exists
    #[error("Migration file already exists: {path}")]
    FileExists { path: String },

    /// Requested migration name is unusable
    #[error("Invalid migration name: {reason}")]
    InvalidName { reason: String },

    /// A procedural migration was registered twice under one filename
    #[error("Procedural migration registered twice: {filename}")]
    DuplicateRegistration { filename: String },

    // ===== IO =====
    /// Filesystem failure
    #[error("IO error during {op}: {reason}")]
    Io { op: String, reason: String },
}

/// Conversion from MigrateError to ExError
impl From<MigrateError> for ExError {
    fn from(err: MigrateError) -> Self {
        match err {
            MigrateError::Schema { reason } => ExError::new(ExErrorKind::Schema)
                .with_op("ensure_schema")
                .with_message(reason),

            MigrateError::DirectoryNotFound { path } => {
                ExError::new(ExErrorKind::DirectoryNotFound)
                    .with_op("list_entries")
                    .with_filename(path)
                    .with_message("Migrations directory not found")
            }

            MigrateError::Statement { filename, reason } => ExError::new(ExErrorKind::Statement)
                .with_op("apply_statements")
                .with_filename(filename)
                .with_message(reason),

            MigrateError::Procedural { filename, reason } => {
                ExError::new(ExErrorKind::Procedural)
                    .with_op("apply_procedural")
                    .with_filename(filename)
                    .with_message(reason)
            }

            MigrateError::LedgerWrite { filename, reason } => {
                ExError::new(ExErrorKind::LedgerWrite)
                    .with_op("record")
                    .with_filename(filename)
                    .with_message(reason)
            }

            MigrateError::DuplicateRecord { filename } => {
                ExError::new(ExErrorKind::DuplicateRecord)
                    .with_op("record")
                    .with_filename(filename)
                    .with_message("Ledger already holds a row for this filename")
            }

            MigrateError::FilenameTooLong { filename, len, max } => {
                ExError::new(ExErrorKind::LedgerWrite)
                    .with_op("record")
                    .with_filename(filename)
                    .with_message(format!(
                        "Filename is {} characters, ledger width is {}",
                        len, max
                    ))
            }

            MigrateError::FileExists { path } => ExError::new(ExErrorKind::FileExists)
                .with_op("create_new")
                .with_filename(path)
                .with_message("Migration file already exists"),

            MigrateError::InvalidName { reason } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("create_new")
                .with_message(format!("Invalid migration name: {}", reason)),

            MigrateError::DuplicateRegistration { filename } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("register_procedural")
                    .with_filename(filename)
                    .with_message("Procedural migration registered twice")
            }

            MigrateError::Io { op, reason } => {
                ExError::new(ExErrorKind::Io).with_op(op).with_message(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_failure_kinds() {
        assert!(ExErrorKind::Statement.is_migration_failure());
        assert!(ExErrorKind::Procedural.is_migration_failure());
        assert!(ExErrorKind::LedgerWrite.is_migration_failure());
        assert!(ExErrorKind::DuplicateRecord.is_migration_failure());
        assert!(!ExErrorKind::Schema.is_migration_failure());
        assert!(!ExErrorKind::DirectoryNotFound.is_migration_failure());
        assert!(!ExErrorKind::FileExists.is_migration_failure());
    }

    #[test]
    fn test_display_includes_code_op_and_filename() {
        let err = ExError::new(ExErrorKind::Statement)
            .with_op("apply_statements")
            .with_filename("20240101_001_init.sql")
            .with_message("near \"SELEC\": syntax error");

        let rendered = err.to_string();
        assert_eq!(
            rendered,
            "[ERR_STATEMENT] in operation 'apply_statements': near \"SELEC\": syntax error (filename: 20240101_001_init.sql)"
        );
    }

    #[test]
    fn test_source_chain_is_exposed() {
        use std::error::Error as _;

        let inner = std::io::Error::other("disk I/O error");
        let outer = ExError::new(ExErrorKind::LedgerWrite).with_source(inner);

        assert_eq!(outer.source().map(|e| e.to_string()), Some("disk I/O error".to_string()));
        assert!(ExError::new(ExErrorKind::Internal).source().is_none());
    }

    #[test]
    fn test_too_long_maps_to_ledger_write() {
        let ex: ExError = MigrateError::FilenameTooLong {
            filename: "x".repeat(121),
            len: 121,
            max: 120,
        }
        .into();
        assert_eq!(ex.kind(), ExErrorKind::LedgerWrite);
        assert!(ex.message().contains("121"));
    }
}
