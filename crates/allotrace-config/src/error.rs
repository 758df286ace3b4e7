//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
///
/// All variants are fatal at startup. A service that cannot read its
/// encryption secret or audit-store settings must refuse to start rather
/// than degrade silently.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration value is absent.
    #[error("Missing required configuration: {name}")]
    Missing {
        /// Name of the missing setting (env var or TOML key).
        name: String,
    },

    /// A configuration value is present but invalid.
    #[error("Invalid configuration for {name}: {message}")]
    Invalid {
        /// Name of the offending setting.
        name: String,
        /// Description of why the value is invalid.
        message: String,
    },

    /// The configuration file could not be read.
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML.
    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Creates a new `Missing` error.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::Missing { name: name.into() }
    }

    /// Creates a new `Invalid` error.
    #[must_use]
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.into(),
            message: message.into(),
        }
    }
}
