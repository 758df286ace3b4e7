//! Error reporting sinks.
//!
//! Operational errors (storage failures, directory lookup failures) are
//! reported to an [`ErrorSink`] selected at startup by configuration.
//! Two implementations exist: [`TracingSink`] forwards to the `tracing`
//! infrastructure, [`NoopSink`] discards everything (tests, air-gapped
//! deployments). Components receive the sink by injection; there is no
//! runtime presence-detection of an optional reporting library.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Capability for reporting operational errors to an external sink.
pub trait ErrorSink: Send + Sync {
    /// Report an error together with the component context it arose in.
    fn report(&self, context: &str, error: &dyn std::error::Error);
}

/// Sink that forwards errors to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, context: &str, error: &dyn std::error::Error) {
        tracing::error!(context, error = %error, "operational error");
    }
}

/// Sink that discards all reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl ErrorSink for NoopSink {
    fn report(&self, _context: &str, _error: &dyn std::error::Error) {}
}

/// Which sink implementation to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    #[default]
    Tracing,
    Noop,
}

/// Construct the configured error sink.
#[must_use]
pub fn sink_for(kind: SinkKind) -> Arc<dyn ErrorSink> {
    match kind {
        SinkKind::Tracing => Arc::new(TracingSink),
        SinkKind::Noop => Arc::new(NoopSink),
    }
}
