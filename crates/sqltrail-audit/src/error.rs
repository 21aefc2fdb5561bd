//! Error types for the audit crate.

use thiserror::Error;

/// Errors that can occur during audit operations.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The configured timestamp format is not a valid chrono format string.
    #[error("invalid timestamp format '{0}'")]
    InvalidTimestampFormat(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
