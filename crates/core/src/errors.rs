//! Error types for the FixIt core library.
//!
//! Each subsystem has its own error type derived with `thiserror`, and a
//! top-level [`CoreError`] enum unifies them for callers that want a single
//! error type.
//!
//! Note that the authority directory itself never returns these errors to
//! its callers once it is open: storage failures are logged and absorbed
//! there. They surface from `AuthorityStore::open` (as [`CoreError`]), from
//! the lower layers it is built on, and from the edit validation helpers.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Unified error type for the entire core library.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

/// Errors from the key-value persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying rusqlite error.
    #[error("database error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// A migration failed.
    #[error("database migration failed (version {version}): {detail}")]
    MigrationFailed {
        version: u32,
        detail: String,
    },

    /// The backing store cannot be used at all (locked, sandboxed, full).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Generic I/O error (e.g. file permissions).
    #[error("storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML parse error.
    #[error("configuration parse error: {0}")]
    ParseError(String),

    /// A config value is invalid.
    #[error("invalid configuration value for '{field}': {detail}")]
    InvalidValue {
        field: String,
        detail: String,
    },

    /// Generic I/O error reading the config file.
    #[error("configuration I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Directory errors
// ---------------------------------------------------------------------------

/// Validation errors for edits to the authority directory.
///
/// `AuthorityStore::update_email` treats an unknown id as a no-op; these
/// errors exist for front ends that want to tell the operator why nothing
/// changed.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The category has no entry in the effective table.
    #[error("unknown authority category '{0}'")]
    UnknownCategory(String),

    /// No authority with this id exists in the category.
    #[error("authority '{id}' not found in category '{category}'")]
    AuthorityNotFound {
        category: String,
        id: String,
    },

    /// The supplied contact address is not usable.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),
}
