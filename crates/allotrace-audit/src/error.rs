//! Audit error types.

use thiserror::Error;

/// Errors that can occur while appending to or reading the audit trail.
///
/// A storage failure during append must propagate to the caller: a
/// silently-lost audit entry is a compliance failure, and an authorization
/// decision that cannot be audited is treated as failed-closed upstream.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The underlying persistent store is unavailable or rejected the
    /// operation.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage failure.
        message: String,
    },

    /// An entry could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AuditError {
    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for AuditError {
    fn from(e: std::io::Error) -> Self {
        Self::storage(e.to_string())
    }
}
