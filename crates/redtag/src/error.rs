//! Error types for redtag.
//!
//! The analysis core (aggregation, trend, report formatting, export) is total
//! and never returns these. They cover the edges: the record store,
//! configuration, intake validation and file output.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for redtag operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Intake Errors ===
    /// A submission failed intake validation.
    #[error("invalid submission: {field}: {message}")]
    InvalidSubmission {
        /// The offending form field (camelCase, as on the form).
        field: &'static str,
        /// Description of the validation failure.
        message: String,
    },

    /// An identical submission is already on record.
    #[error("duplicate submission (fingerprint {fingerprint})")]
    DuplicateSubmission {
        /// Fingerprint shared with the existing record.
        fingerprint: String,
    },

    // === Export Errors ===
    /// Writing an export file failed.
    #[error("failed to write export to {path}: {source}")]
    ExportWrite {
        /// Destination path.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for redtag operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an invalid submission error for the given form field.
    #[must_use]
    pub fn invalid_submission(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidSubmission {
            field,
            message: message.into(),
        }
    }

    /// Check if this error came from intake validation.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::InvalidSubmission { .. })
    }

    /// Check if this error reports a duplicate submission.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateSubmission { .. })
    }
}
