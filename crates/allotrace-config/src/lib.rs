//! # allotrace-config
//!
//! Configuration management for the AlloTrace access-control and audit core.
//!
//! Configuration is read from an optional TOML file and overridden by
//! `ALLOTRACE_*` environment variables. Validation is strict: a missing
//! encryption secret or an inconsistent audit-store selection is a
//! [`ConfigError`] that must prevent the service from serving traffic.
//!
//! ## Modules
//!
//! - [`error`] - Configuration error types
//! - [`settings`] - The `AppConfig` structure, loading and validation
//! - [`telemetry`] - Tracing subscriber initialization

pub mod error;
pub mod settings;
pub mod telemetry;

pub use error::ConfigError;
pub use settings::{AppConfig, AuditBackend};
pub use telemetry::init_tracing;

/// Type alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;
