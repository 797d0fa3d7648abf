//! Core error types for habitkit-core.
//!
//! User-facing failures (missing habit, double completion, duplicate name)
//! get their own variants so the CLI can report them directly; storage and
//! configuration failures are wrapped per concern.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for habitkit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// No habit with the given name exists
    #[error("No habit named '{0}' exists")]
    HabitNotFound(String),

    /// No instance of the habit starts on the given date
    #[error("No instance of '{habit}' starts on {period_start}")]
    InstanceNotFound {
        habit: String,
        period_start: NaiveDate,
    },

    /// The instance was already completed; completion is terminal
    #[error("'{habit}' is already completed for {period_start}")]
    AlreadyCompleted {
        habit: String,
        period_start: NaiveDate,
    },

    /// Habit names are unique; a collision is a rejected write
    #[error("A habit named '{0}' already exists")]
    DuplicateName(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
