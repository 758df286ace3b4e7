//! The audit log: serialized appends, audited queries, chain verification.

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::debug;

use allotrace_core::ResourceRef;

use crate::AuditResult;
use crate::entry::{AuditEntry, AuditEvent, GENESIS_HASH};
use crate::store::AuditStore;

// =============================================================================
// Filter
// =============================================================================

/// Which decision outcomes a filter matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    /// Only allowed events.
    Allow,
    /// Only denied events.
    Deny,
}

/// Filter for audit queries. An unset field matches everything.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Match entries recorded for this actor identity.
    pub actor: Option<String>,

    /// Match entries targeting this resource.
    pub resource: Option<ResourceRef>,

    /// Match entries with this decision outcome.
    pub decision: Option<DecisionKind>,

    /// Match entries recorded at or after this instant.
    pub from: Option<OffsetDateTime>,

    /// Match entries recorded before this instant.
    pub to: Option<OffsetDateTime>,
}

impl AuditFilter {
    /// Creates a filter matching every entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one actor identity.
    #[must_use]
    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Restrict to one resource.
    #[must_use]
    pub fn resource(mut self, resource: ResourceRef) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Restrict to one decision outcome.
    #[must_use]
    pub fn decision(mut self, kind: DecisionKind) -> Self {
        self.decision = Some(kind);
        self
    }

    /// Restrict to entries recorded in `[from, to)`.
    #[must_use]
    pub fn between(mut self, from: OffsetDateTime, to: OffsetDateTime) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(actor) = &self.actor
            && &entry.actor != actor
        {
            return false;
        }
        if let Some(resource) = &self.resource
            && entry.resource.as_ref() != Some(resource)
        {
            return false;
        }
        if let Some(kind) = self.decision {
            let is_allow = entry.decision.is_allow();
            if (kind == DecisionKind::Allow) != is_allow {
                return false;
            }
        }
        if let Some(from) = self.from
            && entry.timestamp < from
        {
            return false;
        }
        if let Some(to) = self.to
            && entry.timestamp >= to
        {
            return false;
        }
        true
    }
}

// =============================================================================
// Chain Verification
// =============================================================================

/// Result of verifying the chain's continuity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainVerification {
    /// Every checked entry matches its hash and links to its predecessor.
    Valid,
    /// Continuity is broken starting at this entry index.
    BrokenAt(usize),
}

impl ChainVerification {
    /// Returns `true` if the chain verified cleanly.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

// =============================================================================
// Audit Log
// =============================================================================

/// The tamper-evident audit log over an [`AuditStore`] backend.
///
/// Appends are serialized behind the chain-head mutex so the hash linkage
/// stays well-ordered under concurrent requests. The head is only advanced
/// after the store acknowledges the append, so a failed or cancelled append
/// leaves the chain untouched.
pub struct AuditLog {
    store: Arc<dyn AuditStore>,
    head: Mutex<String>,
}

impl AuditLog {
    /// Opens the log, seeding the chain head from the last stored entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub async fn open(store: Arc<dyn AuditStore>) -> AuditResult<Self> {
        let head = match store.last().await? {
            Some(entry) => entry.hash,
            None => GENESIS_HASH.to_string(),
        };
        Ok(Self {
            store,
            head: Mutex::new(head),
        })
    }

    /// Appends one event to the chain.
    ///
    /// The entry is durably queued before this returns; callers must await
    /// completion before responding, so an allowed action is never
    /// unrecorded.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuditError::Storage`] if the backend rejects the
    /// append. The chain head is not advanced in that case.
    pub async fn append(&self, event: AuditEvent) -> AuditResult<AuditEntry> {
        let mut head = self.head.lock().await;
        let entry = AuditEntry::seal(event, &head);
        self.store.append_record(&entry).await?;
        *head = entry.hash.clone();
        debug!(actor = %entry.actor, action = %entry.action, "audit entry appended");
        Ok(entry)
    }

    /// Queries the log, filtered. The read itself is audited: an
    /// `audit.query` entry is appended for `reader` before the results are
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the audit append for the read fails (the query
    /// is then not served) or the backend cannot be read.
    pub async fn query(&self, reader: &str, filter: &AuditFilter) -> AuditResult<Vec<AuditEntry>> {
        use crate::entry::Decision;
        self.append(AuditEvent::new(reader, "audit.query", Decision::Allow))
            .await?;
        let entries = self.store.read_range(0, None).await?;
        Ok(entries
            .into_iter()
            .filter(|entry| filter.matches(entry))
            .collect())
    }

    /// Verifies the continuity of the first `limit` entries (all when
    /// `None`), anchored at the genesis hash.
    ///
    /// Verification always starts at the head of the chain because each
    /// link can only be checked against its full prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub async fn verify_chain(&self, limit: Option<usize>) -> AuditResult<ChainVerification> {
        let entries = self.store.read_range(0, limit).await?;
        let mut previous = GENESIS_HASH.to_string();
        for (index, entry) in entries.iter().enumerate() {
            if !entry.links_to(&previous) {
                return Ok(ChainVerification::BrokenAt(index));
            }
            previous = entry.hash.clone();
        }
        Ok(ChainVerification::Valid)
    }

    /// Number of entries in the log.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub async fn len(&self) -> AuditResult<usize> {
        self.store.len().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Decision;
    use crate::store::{FileAuditStore, MemoryAuditStore};

    async fn log_with_memory_store() -> AuditLog {
        AuditLog::open(Arc::new(MemoryAuditStore::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_appends_chain_in_order() {
        let log = log_with_memory_store().await;
        let first = log
            .append(AuditEvent::new("u1", "authorize:ViewCase", Decision::Allow))
            .await
            .unwrap();
        let second = log
            .append(AuditEvent::new(
                "u2",
                "authorize:CreateCase",
                Decision::deny("FORBIDDEN"),
            ))
            .await
            .unwrap();

        assert_eq!(first.previous_hash, GENESIS_HASH);
        assert_eq!(second.previous_hash, first.hash);
        assert!(log.verify_chain(None).await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn test_concurrent_appends_keep_linkage() {
        let log = Arc::new(log_with_memory_store().await);
        let mut handles = Vec::new();
        for i in 0..16 {
            let log = Arc::clone(&log);
            handles.push(tokio::spawn(async move {
                log.append(AuditEvent::new(
                    format!("u{i}"),
                    "authorize:ViewCase",
                    Decision::Allow,
                ))
                .await
                .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(log.len().await.unwrap(), 16);
        assert!(log.verify_chain(None).await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn test_query_is_audited_and_filtered() {
        let log = log_with_memory_store().await;
        log.append(
            AuditEvent::new("u1", "authorize:ViewCase", Decision::Allow)
                .with_resource(ResourceRef::new("Case", "c-1")),
        )
        .await
        .unwrap();
        log.append(AuditEvent::new(
            "u2",
            "authorize:ViewCase",
            Decision::deny("FORBIDDEN"),
        ))
        .await
        .unwrap();

        let denials = log
            .query("auditor-1", &AuditFilter::new().decision(DecisionKind::Deny))
            .await
            .unwrap();
        assert_eq!(denials.len(), 1);
        assert_eq!(denials[0].actor, "u2");

        // The query itself appended an entry for the reader.
        let reads = log
            .query("auditor-1", &AuditFilter::new().actor("auditor-1"))
            .await
            .unwrap();
        assert!(reads.iter().any(|e| e.action == "audit.query"));
    }

    #[tokio::test]
    async fn test_filter_by_resource_and_time() {
        let log = log_with_memory_store().await;
        let case = ResourceRef::new("Case", "c-1");
        log.append(
            AuditEvent::new("u1", "authorize:ViewCase", Decision::Allow)
                .with_resource(case.clone()),
        )
        .await
        .unwrap();
        log.append(AuditEvent::new("u1", "authorize:ViewCase", Decision::Allow))
            .await
            .unwrap();

        let by_resource = log
            .query("auditor", &AuditFilter::new().resource(case.clone()))
            .await
            .unwrap();
        assert_eq!(by_resource.len(), 1);

        let future = OffsetDateTime::now_utc() + time::Duration::hours(1);
        let far_future = future + time::Duration::hours(1);
        let none = log
            .query("auditor", &AuditFilter::new().between(future, far_future))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_tampering_detected_at_first_broken_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.ndjson");

        let log = AuditLog::open(Arc::new(FileAuditStore::new(&path)))
            .await
            .unwrap();
        for i in 0..4 {
            log.append(AuditEvent::new(
                format!("u{i}"),
                "authorize:ViewCase",
                Decision::Allow,
            ))
            .await
            .unwrap();
        }
        assert!(log.verify_chain(None).await.unwrap().is_valid());

        // Tamper with the second stored entry.
        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines: Vec<String> = contents.lines().map(String::from).collect();
        lines[1] = lines[1].replace("\"actor\":\"u1\"", "\"actor\":\"mallory\"");
        std::fs::write(&path, lines.join("\n") + "\n").unwrap();

        let reopened = AuditLog::open(Arc::new(FileAuditStore::new(&path)))
            .await
            .unwrap();
        assert_eq!(
            reopened.verify_chain(None).await.unwrap(),
            ChainVerification::BrokenAt(1)
        );
    }

    #[tokio::test]
    async fn test_reopen_continues_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.ndjson");

        let log = AuditLog::open(Arc::new(FileAuditStore::new(&path)))
            .await
            .unwrap();
        let first = log
            .append(AuditEvent::new("u1", "authorize:ViewCase", Decision::Allow))
            .await
            .unwrap();
        drop(log);

        let reopened = AuditLog::open(Arc::new(FileAuditStore::new(&path)))
            .await
            .unwrap();
        let second = reopened
            .append(AuditEvent::new("u2", "authorize:ViewCase", Decision::Allow))
            .await
            .unwrap();
        assert_eq!(second.previous_hash, first.hash);
        assert!(reopened.verify_chain(None).await.unwrap().is_valid());
    }
}
