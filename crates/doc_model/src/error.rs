//! Error types for the document model

use thiserror::Error;

/// Errors that can occur while working with the document tree
#[derive(Debug, Error)]
pub enum DocModelError {
    /// JSON serialization or deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A node attribute did not have the expected shape
    #[error("Invalid attribute '{name}': {reason}")]
    InvalidAttribute { name: String, reason: String },
}

/// Result type for document model operations
pub type DocModelResult<T> = std::result::Result<T, DocModelError>;
