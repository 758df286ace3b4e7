//! Consent records and their storage.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::AuthResult;

// =============================================================================
// Consent Types
// =============================================================================

/// The classes of consent a data subject can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentType {
    /// Consent to organ recovery.
    OrganRecovery,
    /// Consent to tissue use in research.
    TissueResearch,
    /// Consent to sharing records with partner organizations.
    DataSharing,
}

impl ConsentType {
    /// The consent type's stable tag.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrganRecovery => "organ_recovery",
            Self::TissueResearch => "tissue_research",
            Self::DataSharing => "data_sharing",
        }
    }
}

impl fmt::Display for ConsentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Consent Record
// =============================================================================

/// One grant of consent, possibly later withdrawn.
///
/// Withdrawal flips `withdrawn` and stamps `withdrawn_at`; records are
/// never physically deleted, so the full grant/withdraw history stays
/// queryable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentRecord {
    /// Unique record identifier.
    pub id: Uuid,

    /// The data subject who granted consent.
    pub user_id: String,

    /// What was consented to.
    pub consent_type: ConsentType,

    /// When consent was granted.
    #[serde(with = "time::serde::rfc3339")]
    pub granted_at: OffsetDateTime,

    /// Whether this grant has been withdrawn.
    pub withdrawn: bool,

    /// When it was withdrawn, if it was.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub withdrawn_at: Option<OffsetDateTime>,
}

impl ConsentRecord {
    fn grant(user_id: impl Into<String>, consent_type: ConsentType) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            consent_type,
            granted_at: OffsetDateTime::now_utc(),
            withdrawn: false,
            withdrawn_at: None,
        }
    }
}

// =============================================================================
// Storage
// =============================================================================

/// Store of consent records.
#[async_trait]
pub trait ConsentStorage: Send + Sync {
    /// Records a new grant of `consent_type` by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Storage`] if the backend rejects the
    /// write.
    async fn record_grant(
        &self,
        user_id: &str,
        consent_type: ConsentType,
    ) -> AuthResult<ConsentRecord>;

    /// Withdraws the current grant for `(user_id, consent_type)`.
    ///
    /// Returns `true` if a current grant was withdrawn, `false` if there
    /// was none (idempotent).
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Storage`] if the backend rejects the
    /// write.
    async fn withdraw(&self, user_id: &str, consent_type: ConsentType) -> AuthResult<bool>;

    /// Every record ever created for `(user_id, consent_type)`, oldest
    /// first, withdrawn records included.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Storage`] if the backend cannot be read.
    async fn history(
        &self,
        user_id: &str,
        consent_type: ConsentType,
    ) -> AuthResult<Vec<ConsentRecord>>;

    /// The most recent record for `(user_id, consent_type)` iff it is not
    /// withdrawn. A withdrawn latest record yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Storage`] if the backend cannot be read.
    async fn current(
        &self,
        user_id: &str,
        consent_type: ConsentType,
    ) -> AuthResult<Option<ConsentRecord>>;
}

/// In-memory consent store. Tests and development.
#[derive(Debug, Default)]
pub struct MemoryConsentStore {
    records: RwLock<Vec<ConsentRecord>>,
}

impl MemoryConsentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConsentStorage for MemoryConsentStore {
    async fn record_grant(
        &self,
        user_id: &str,
        consent_type: ConsentType,
    ) -> AuthResult<ConsentRecord> {
        let record = ConsentRecord::grant(user_id, consent_type);
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn withdraw(&self, user_id: &str, consent_type: ConsentType) -> AuthResult<bool> {
        let mut records = self.records.write().await;
        let latest = records
            .iter_mut()
            .rev()
            .find(|r| r.user_id == user_id && r.consent_type == consent_type && !r.withdrawn);
        match latest {
            Some(record) => {
                record.withdrawn = true;
                record.withdrawn_at = Some(OffsetDateTime::now_utc());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn history(
        &self,
        user_id: &str,
        consent_type: ConsentType,
    ) -> AuthResult<Vec<ConsentRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id && r.consent_type == consent_type)
            .cloned()
            .collect())
    }

    async fn current(
        &self,
        user_id: &str,
        consent_type: ConsentType,
    ) -> AuthResult<Option<ConsentRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .rev()
            .find(|r| r.user_id == user_id && r.consent_type == consent_type)
            .filter(|r| !r.withdrawn)
            .cloned())
    }
}
