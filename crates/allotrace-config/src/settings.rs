//! Application configuration loading and validation.
//!
//! Settings come from an optional TOML file, with `ALLOTRACE_*` environment
//! variables taking precedence. [`AppConfig::load`] validates the merged
//! result and fails fast: the caller is expected to abort startup on error.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use allotrace_core::SinkKind;

use crate::{ConfigError, ConfigResult};

/// Environment variable holding the field-encryption secret.
pub const ENV_ENCRYPTION_KEY: &str = "ALLOTRACE_ENCRYPTION_KEY";
/// Environment variable selecting the audit store backend.
pub const ENV_AUDIT_BACKEND: &str = "ALLOTRACE_AUDIT_BACKEND";
/// Environment variable with the audit log file path (file backend only).
pub const ENV_AUDIT_LOG_PATH: &str = "ALLOTRACE_AUDIT_LOG_PATH";
/// Environment variable selecting the error sink.
pub const ENV_ERROR_SINK: &str = "ALLOTRACE_ERROR_SINK";
/// Environment variable with the tracing filter directive.
pub const ENV_LOG_FILTER: &str = "ALLOTRACE_LOG_FILTER";

// =============================================================================
// Audit Backend Selection
// =============================================================================

/// Which audit store implementation to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditBackend {
    /// In-memory store; entries are lost on restart. Development and tests.
    #[default]
    Memory,
    /// Append-only NDJSON file store.
    File,
}

impl FromStr for AuditBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(ConfigError::invalid(
                ENV_AUDIT_BACKEND,
                format!("unknown audit backend '{other}'"),
            )),
        }
    }
}

// =============================================================================
// TOML File Shape
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    encryption_key: Option<String>,
    log_filter: Option<String>,
    error_sink: Option<SinkKind>,
    #[serde(default)]
    audit: FileAuditSection,
}

#[derive(Debug, Default, Deserialize)]
struct FileAuditSection {
    backend: Option<AuditBackend>,
    path: Option<PathBuf>,
}

// =============================================================================
// AppConfig
// =============================================================================

/// Validated application configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Secret the field-encryption key is derived from. Never logged.
    pub encryption_secret: String,

    /// Selected audit store backend.
    pub audit_backend: AuditBackend,

    /// Audit log path; required when the backend is `File`.
    pub audit_log_path: Option<PathBuf>,

    /// Selected error sink implementation.
    pub error_sink: SinkKind,

    /// Tracing filter directive (e.g. `"info,allotrace_auth=debug"`).
    pub log_filter: String,
}

impl AppConfig {
    /// Load configuration from the optional TOML file and the environment,
    /// then validate it.
    ///
    /// Environment variables override file values.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, a
    /// required value is missing, or the merged settings are inconsistent.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let file: FileConfig = match path {
            Some(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
            None => FileConfig::default(),
        };

        let encryption_secret = match env::var(ENV_ENCRYPTION_KEY) {
            Ok(value) => Some(value),
            Err(env::VarError::NotPresent) => file.encryption_key,
            Err(e) => {
                return Err(ConfigError::invalid(ENV_ENCRYPTION_KEY, e.to_string()));
            }
        }
        .ok_or_else(|| ConfigError::missing(ENV_ENCRYPTION_KEY))?;

        let audit_backend = match env::var(ENV_AUDIT_BACKEND) {
            Ok(value) => value.parse()?,
            Err(_) => file.audit.backend.unwrap_or_default(),
        };

        let audit_log_path = env::var_os(ENV_AUDIT_LOG_PATH)
            .map(PathBuf::from)
            .or(file.audit.path);

        let error_sink = match env::var(ENV_ERROR_SINK) {
            Ok(value) => match value.as_str() {
                "tracing" => SinkKind::Tracing,
                "noop" => SinkKind::Noop,
                other => {
                    return Err(ConfigError::invalid(
                        ENV_ERROR_SINK,
                        format!("unknown error sink '{other}'"),
                    ));
                }
            },
            Err(_) => file.error_sink.unwrap_or_default(),
        };

        let log_filter = env::var(ENV_LOG_FILTER)
            .ok()
            .or(file.log_filter)
            .unwrap_or_else(|| "info".to_string());

        let config = Self {
            encryption_secret,
            audit_backend,
            audit_log_path,
            error_sink,
            log_filter,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the environment only.
    pub fn from_env() -> ConfigResult<Self> {
        Self::load(None)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.encryption_secret.trim().is_empty() {
            return Err(ConfigError::invalid(
                ENV_ENCRYPTION_KEY,
                "encryption secret must not be empty",
            ));
        }
        if self.audit_backend == AuditBackend::File && self.audit_log_path.is_none() {
            return Err(ConfigError::missing(ENV_AUDIT_LOG_PATH));
        }
        Ok(())
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("encryption_secret", &"<redacted>")
            .field("audit_backend", &self.audit_backend)
            .field("audit_log_path", &self.audit_log_path)
            .field("error_sink", &self.error_sink)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}
