//! Audit entries and the chaining hash.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use uuid::Uuid;

use allotrace_core::ResourceRef;

/// Chaining value of the first entry (no predecessor).
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

// =============================================================================
// Decision
// =============================================================================

/// Outcome recorded for an audited event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The action was allowed.
    Allow,
    /// The action was denied.
    Deny {
        /// Machine-readable denial reason code.
        reason: String,
    },
}

impl Decision {
    /// Creates a deny decision with the given reason code.
    #[must_use]
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny {
            reason: reason.into(),
        }
    }

    /// Returns `true` if this decision is an allow.
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

// =============================================================================
// Audit Event
// =============================================================================

/// An event to be recorded, before it is sealed into the chain.
///
/// Callers build an `AuditEvent`; [`crate::AuditLog::append`] assigns the
/// id, timestamp, and chaining hashes.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Actor identity ("anonymous" when no actor was resolved).
    pub actor: String,

    /// Actor role name, if known.
    pub role: Option<String>,

    /// Audited action, e.g. `"authorize:ViewCase"` or `"audit.query"`.
    pub action: String,

    /// Resource the action targeted, if any.
    pub resource: Option<ResourceRef>,

    /// Recorded outcome.
    pub decision: Decision,
}

impl AuditEvent {
    /// Creates a new event for the given actor, action, and decision.
    #[must_use]
    pub fn new(actor: impl Into<String>, action: impl Into<String>, decision: Decision) -> Self {
        Self {
            actor: actor.into(),
            role: None,
            action: action.into(),
            resource: None,
            decision,
        }
    }

    /// Sets the actor's role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Sets the target resource.
    #[must_use]
    pub fn with_resource(mut self, resource: ResourceRef) -> Self {
        self.resource = Some(resource);
        self
    }
}

// =============================================================================
// Audit Entry
// =============================================================================

/// An immutable, chained record of one audited event.
///
/// Created exactly once per event and never updated or deleted. `hash`
/// covers every content field plus `previous_hash`, which makes undetected
/// modification of any stored entry evident on verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry identifier.
    pub id: Uuid,

    /// When the event was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,

    /// Actor identity.
    pub actor: String,

    /// Actor role name, if known.
    pub role: Option<String>,

    /// Audited action.
    pub action: String,

    /// Resource the action targeted, if any.
    pub resource: Option<ResourceRef>,

    /// Recorded outcome.
    pub decision: Decision,

    /// Hash of the previous entry ([`GENESIS_HASH`] for the first entry).
    pub previous_hash: String,

    /// SHA-256 hash of this entry's content and `previous_hash`.
    pub hash: String,
}

impl AuditEntry {
    /// Seals an event into the chain after the entry with `previous_hash`.
    pub(crate) fn seal(event: AuditEvent, previous_hash: &str) -> Self {
        let mut entry = Self {
            id: Uuid::new_v4(),
            timestamp: OffsetDateTime::now_utc(),
            actor: event.actor,
            role: event.role,
            action: event.action,
            resource: event.resource,
            decision: event.decision,
            previous_hash: previous_hash.to_string(),
            hash: String::new(),
        };
        entry.hash = entry.compute_hash();
        entry
    }

    /// Recomputes the chaining hash from the entry's stored content.
    ///
    /// Equal to `self.hash` iff the entry has not been tampered with.
    ///
    /// Every variable-length field is length-prefixed and every optional
    /// field carries a presence byte, so the hash input is an injective
    /// encoding of the content: no two distinct entries serialize to the
    /// same byte stream, and shifting bytes across a field boundary
    /// changes the digest.
    #[must_use]
    pub fn compute_hash(&self) -> String {
        fn field(hasher: &mut Sha256, bytes: &[u8]) {
            hasher.update((bytes.len() as u64).to_be_bytes());
            hasher.update(bytes);
        }
        fn optional(hasher: &mut Sha256, value: Option<&[u8]>) {
            match value {
                Some(bytes) => {
                    hasher.update([1u8]);
                    field(hasher, bytes);
                }
                None => hasher.update([0u8]),
            }
        }

        let mut hasher = Sha256::new();
        hasher.update(self.id.as_bytes());
        hasher.update(self.timestamp.unix_timestamp_nanos().to_be_bytes());
        field(&mut hasher, self.actor.as_bytes());
        optional(&mut hasher, self.role.as_deref().map(str::as_bytes));
        field(&mut hasher, self.action.as_bytes());
        // The resource's type and id are hashed as separate fields; the
        // "Type/id" rendering would be ambiguous when the id itself
        // contains a slash.
        match &self.resource {
            Some(resource) => {
                hasher.update([1u8]);
                field(&mut hasher, resource.resource_type.as_bytes());
                field(&mut hasher, resource.id.as_bytes());
            }
            None => hasher.update([0u8]),
        }
        match &self.decision {
            Decision::Allow => hasher.update([0u8]),
            Decision::Deny { reason } => {
                hasher.update([1u8]);
                field(&mut hasher, reason.as_bytes());
            }
        }
        field(&mut hasher, self.previous_hash.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Returns `true` if the entry's content matches its hash and it links
    /// to the given predecessor.
    #[must_use]
    pub fn links_to(&self, previous_hash: &str) -> bool {
        self.previous_hash == previous_hash && self.hash == self.compute_hash()
    }
}
