//! Authorization error types.

use thiserror::Error;

/// Errors that can occur during authorization and consent operations.
///
/// Authorization and consent failures are expected and recoverable; the
/// caller translates them to structured HTTP errors. Configuration errors
/// are fatal at startup. Storage errors must propagate: an authorization
/// check that cannot be audited is treated as failed-closed, never
/// silently allowed.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No actor was resolved for the request.
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        /// Description of why the request is unauthenticated.
        message: String,
    },

    /// The actor lacks the coarse permission or fine-grained ACL grant.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Description of why access is forbidden.
        message: String,
    },

    /// The action is gated on a missing or withdrawn consent.
    #[error("Consent required: {message}")]
    ConsentRequired {
        /// Description of the missing consent.
        message: String,
    },

    /// The authorization configuration is invalid (unknown role tag,
    /// missing secret, unset storage path).
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },

    /// A storage operation (audit append, policy or consent read/write)
    /// failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Unauthenticated` error.
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Creates a new `Forbidden` error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a new `ConsentRequired` error.
    #[must_use]
    pub fn consent_required(message: impl Into<String>) -> Self {
        Self::ConsentRequired {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Machine-readable error code for the HTTP error body.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated { .. } => "UNAUTHORIZED",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::ConsentRequired { .. } => "CONSENT_REQUIRED",
            Self::Configuration { .. } | Self::Storage { .. } => "INTERNAL",
        }
    }

    /// HTTP status the caller should translate this error to.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Unauthenticated { .. } => 401,
            Self::Forbidden { .. } | Self::ConsentRequired { .. } => 403,
            Self::Configuration { .. } | Self::Storage { .. } => 500,
        }
    }

    /// Returns `true` if this is an expected, user-facing denial.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated { .. } | Self::Forbidden { .. } | Self::ConsentRequired { .. }
        )
    }
}

impl From<allotrace_audit::AuditError> for AuthError {
    fn from(e: allotrace_audit::AuditError) -> Self {
        Self::storage(e.to_string())
    }
}
