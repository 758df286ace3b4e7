use thiserror::Error;

/// Core error types for AlloTrace operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid resource reference: {0}")]
    InvalidResourceRef(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Time parsing error: {0}")]
    TimeError(#[from] time::error::Parse),

    #[error("UUID error: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    /// Create a new InvalidResourceRef error
    pub fn invalid_resource_ref(reference: impl Into<String>) -> Self {
        Self::InvalidResourceRef(reference.into())
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
