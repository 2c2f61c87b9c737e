//! # Bank Reviews - relational data model for bank customer reviews
//!
//! Two entities in a one-to-many relationship:
//! - `banks`: one row per reviewed institution, with aggregate rating statistics
//! - `reviews`: one row per user-submitted review, owned by a bank
//!
//! The crate provides:
//! - Idempotent SQLite schema creation (tables, foreign key, indices)
//! - Typed `Bank` / `Review` rows and the primitive writes needed to use them
//! - Classification of constraint violations raised by the store

pub mod bank;
pub mod review;
pub mod storage;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use bank::{Bank, NewBank};
pub use review::{Review, SentimentLabel};
pub use storage::ReviewStore;

/// Result type alias for bank review store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for bank review store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    Constraint(ConstraintViolation),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Bank not found: {0}")]
    BankNotFound(i64),
}

impl Error {
    /// The constraint kind, if this error is a constraint violation
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            Error::Constraint(v) => Some(v.kind),
            _ => None,
        }
    }
}

/// Which declared constraint rejected a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
    ForeignKey,
    NotNull,
    Other,
}

impl ConstraintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::PrimaryKey => "primary key",
            ConstraintKind::Unique => "unique",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::NotNull => "not null",
            ConstraintKind::Other => "constraint",
        }
    }
}

/// A write rejected by the store, surfaced as-is to the caller
#[derive(Debug, Clone)]
pub struct ConstraintViolation {
    pub kind: ConstraintKind,
    pub message: String,
}

impl std::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.kind.as_str())
    }
}

/// Map a SQLite failure onto the crate error, splitting out constraint failures
/// by their extended result code.
pub(crate) fn classify(err: rusqlite::Error) -> Error {
    use rusqlite::ffi;

    if let rusqlite::Error::SqliteFailure(code, ref msg) = err {
        if code.code == rusqlite::ErrorCode::ConstraintViolation {
            let kind = match code.extended_code {
                ffi::SQLITE_CONSTRAINT_PRIMARYKEY => ConstraintKind::PrimaryKey,
                ffi::SQLITE_CONSTRAINT_UNIQUE => ConstraintKind::Unique,
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
                ffi::SQLITE_CONSTRAINT_NOTNULL => ConstraintKind::NotNull,
                _ => ConstraintKind::Other,
            };
            let message = msg.clone().unwrap_or_else(|| code.to_string());
            return Error::Constraint(ConstraintViolation { kind, message });
        }
    }
    Error::Storage(err)
}
