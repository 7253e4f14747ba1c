//! Error types for the installer.

use bytes_schema::SchemaError;

/// Errors that can occur while planning or applying a schema.
#[derive(Debug, thiserror::Error)]
pub enum InstallerError {
    /// A manifest declared an invalid schema.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Database error while introspecting or executing.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A requested implementation has no registered manifest.
    #[error("No manifest registered for implementation '{0}'")]
    UnknownImplementation(String),

    /// The database reported metadata that cannot be interpreted.
    #[error("Invalid metadata for table '{table}': {message}")]
    InvalidMetadata {
        /// Table being analysed.
        table: String,
        /// What was wrong.
        message: String,
    },
}

/// Result type for installer operations.
pub type Result<T> = std::result::Result<T, InstallerError>;
