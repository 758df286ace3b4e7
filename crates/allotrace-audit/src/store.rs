//! Audit store backends.
//!
//! The `AuditStore` trait is the persistence seam for the audit trail. The
//! public contract is append-and-read only: there is no update or delete,
//! and backends are expected to enforce that at the storage layer as well
//! (the file backend opens its log append-only).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::entry::AuditEntry;
use crate::{AuditError, AuditResult};

// =============================================================================
// Audit Store Trait
// =============================================================================

/// Persistence operations for audit entries.
///
/// Implementations must make `append_record` atomic: on error the entry is
/// not visible to readers at all. Serialization of concurrent appends is
/// the responsibility of [`crate::AuditLog`], which holds the chain head
/// lock across the append.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Durably append one entry.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Storage`] if the underlying store is
    /// unavailable. The error must propagate; a silently-lost entry is a
    /// compliance failure.
    async fn append_record(&self, entry: &AuditEntry) -> AuditResult<()>;

    /// Read entries `[start, end)` in append order (`end = None` reads to
    /// the tail).
    async fn read_range(&self, start: usize, end: Option<usize>) -> AuditResult<Vec<AuditEntry>>;

    /// The last appended entry, if any.
    async fn last(&self) -> AuditResult<Option<AuditEntry>>;

    /// Number of stored entries.
    async fn len(&self) -> AuditResult<usize>;
}

// =============================================================================
// In-Memory Backend
// =============================================================================

/// In-memory audit store for development and tests.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    entries: RwLock<Vec<AuditEntry>>,
}

impl MemoryAuditStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append_record(&self, entry: &AuditEntry) -> AuditResult<()> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn read_range(&self, start: usize, end: Option<usize>) -> AuditResult<Vec<AuditEntry>> {
        let entries = self.entries.read().await;
        let end = end.unwrap_or(entries.len()).min(entries.len());
        let start = start.min(end);
        Ok(entries[start..end].to_vec())
    }

    async fn last(&self) -> AuditResult<Option<AuditEntry>> {
        Ok(self.entries.read().await.last().cloned())
    }

    async fn len(&self) -> AuditResult<usize> {
        Ok(self.entries.read().await.len())
    }
}

// =============================================================================
// NDJSON File Backend
// =============================================================================

/// Append-only audit store backed by a newline-delimited JSON file.
///
/// Each entry is written as a single line in one write call, so a crashed
/// append leaves at most one trailing partial line, which readers skip and
/// verification reports. The file is only ever opened in append mode.
#[derive(Debug, Clone)]
pub struct FileAuditStore {
    path: PathBuf,
}

impl FileAuditStore {
    /// Creates a store writing to the given path. The file is created on
    /// first append.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn read_entries(&self) -> AuditResult<Vec<AuditEntry>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut entries = Vec::new();
        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    // A torn trailing line from an interrupted append; the
                    // chain verification will surface it if it matters.
                    tracing::warn!(path = %self.path.display(), error = %e, "skipping unparseable audit line");
                }
            }
        }
        Ok(entries)
    }
}

#[async_trait]
impl AuditStore for FileAuditStore {
    async fn append_record(&self, entry: &AuditEntry) -> AuditResult<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                AuditError::storage(format!("unable to open {}: {e}", self.path.display()))
            })?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn read_range(&self, start: usize, end: Option<usize>) -> AuditResult<Vec<AuditEntry>> {
        let entries = self.read_entries().await?;
        let end = end.unwrap_or(entries.len()).min(entries.len());
        let start = start.min(end);
        Ok(entries[start..end].to_vec())
    }

    async fn last(&self) -> AuditResult<Option<AuditEntry>> {
        Ok(self.read_entries().await?.pop())
    }

    async fn len(&self) -> AuditResult<usize> {
        Ok(self.read_entries().await?.len())
    }
}
