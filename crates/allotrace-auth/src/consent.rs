//! The consent gate.

use std::sync::Arc;

use tracing::debug;

use allotrace_audit::{AuditEvent, AuditLog, Decision};

use crate::AuthResult;
use crate::error::AuthError;
use crate::storage::{ConsentStorage, ConsentType};

/// Guard requiring an explicit, current, non-withdrawn consent before a
/// consent-gated action runs.
///
/// The engine consults [`ConsentGate::has_current_consent`] inside its
/// evaluation so one authorize call still yields exactly one audit entry;
/// [`ConsentGate::require_consent`] is the standalone guard for call sites
/// outside the engine, and audits its own denials.
#[derive(Clone)]
pub struct ConsentGate {
    storage: Arc<dyn ConsentStorage>,
    audit: Arc<AuditLog>,
}

impl ConsentGate {
    /// Creates a gate over the given consent store and audit log.
    #[must_use]
    pub fn new(storage: Arc<dyn ConsentStorage>, audit: Arc<AuditLog>) -> Self {
        Self { storage, audit }
    }

    /// The consent store this gate reads.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn ConsentStorage> {
        &self.storage
    }

    /// Returns `true` iff the subject's most recent consent of this type
    /// exists and has not been withdrawn.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the consent store cannot be read.
    pub async fn has_current_consent(
        &self,
        subject: &str,
        consent_type: ConsentType,
    ) -> AuthResult<bool> {
        Ok(self.storage.current(subject, consent_type).await?.is_some())
    }

    /// Requires a current consent of `consent_type` from `subject` before
    /// `actor` proceeds. A denial is appended to the audit log before it is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ConsentRequired`] if no current consent exists,
    /// or [`AuthError::Storage`] if the consent store or the audit append
    /// fails.
    pub async fn require_consent(
        &self,
        actor: &str,
        subject: &str,
        consent_type: ConsentType,
    ) -> AuthResult<()> {
        if self.has_current_consent(subject, consent_type).await? {
            return Ok(());
        }
        debug!(actor, subject, %consent_type, "consent check failed");
        self.audit
            .append(AuditEvent::new(
                actor,
                format!("consent.check:{consent_type}"),
                Decision::deny("CONSENT_REQUIRED"),
            ))
            .await?;
        Err(AuthError::consent_required(format!(
            "no current {consent_type} consent from '{subject}'"
        )))
    }
}
