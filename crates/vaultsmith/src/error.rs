//! Error types for the Vaultsmith library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Vaultsmith operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A column name that does not exist in the table.
    #[error("Column not found: '{column}'")]
    ColumnNotFound { column: String },

    /// Zero rows or zero columns supplied to the pipeline.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// The advisory collaborator was unreachable, misconfigured, or
    /// returned a response that did not parse.
    #[error("Advisory unavailable: {0}")]
    AdvisoryUnavailable(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Vaultsmith operations.
pub type Result<T> = std::result::Result<T, VaultError>;
