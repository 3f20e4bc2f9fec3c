//! Error types for the data-access layer.

use thiserror::Error;

/// Errors that can occur during document store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A document could not be converted to or from JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data in the store does not match the expected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested document was not found.
    #[error("not found")]
    NotFound,

    /// The write conflicts with existing data (e.g. a category still in use).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A merge-update was given something other than a JSON object.
    #[error("invalid patch: {0}")]
    InvalidPatch(String),
}

/// Errors that can occur during object storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Transport-level failure talking to the storage service.
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The storage service answered with a non-success status.
    #[error("storage service returned {status}: {message}")]
    Status { status: u16, message: String },

    /// No object exists at the path.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The path or URL does not address an object in this bucket.
    #[error("invalid object path: {0}")]
    InvalidPath(String),
}
