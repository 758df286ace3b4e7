//! # allotrace-core
//!
//! Core types shared across the AlloTrace access-control and audit crates.
//!
//! This crate provides:
//! - Resource references for stored artifacts and case records
//! - The core error type
//! - The error-sink capability used for operational error reporting
//!
//! ## Modules
//!
//! - [`error`] - Core error types
//! - [`resource`] - References to platform resources
//! - [`sink`] - Error reporting sinks (real and no-op)

pub mod error;
pub mod resource;
pub mod sink;

pub use error::CoreError;
pub use resource::ResourceRef;
pub use sink::{ErrorSink, NoopSink, SinkKind, TracingSink, sink_for};

/// Type alias for core operation results.
pub type CoreResult<T> = Result<T, CoreError>;
