//! # allotrace-audit
//!
//! Append-only, tamper-evident audit trail for every access decision and
//! state mutation in the platform.
//!
//! Each entry incorporates a SHA-256 chaining hash over its own content and
//! the previous entry's hash, so the sequence can be verified for
//! continuity. Entries are never mutated or deleted through the public
//! contract; the reference file backend opens its log append-only.
//!
//! ## Modules
//!
//! - [`entry`] - Audit entries, decisions, and the chaining hash
//! - [`store`] - The `AuditStore` trait with memory and NDJSON-file backends
//! - [`log`] - The `AuditLog`: serialized appends, audited queries, chain
//!   verification
//! - [`error`] - Audit error types

pub mod entry;
pub mod error;
pub mod log;
pub mod store;

pub use entry::{AuditEntry, AuditEvent, Decision, GENESIS_HASH};
pub use error::AuditError;
pub use log::{AuditFilter, AuditLog, ChainVerification, DecisionKind};
pub use store::{AuditStore, FileAuditStore, MemoryAuditStore};

/// Type alias for audit operation results.
pub type AuditResult<T> = Result<T, AuditError>;
