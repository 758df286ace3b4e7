//! Startup wiring.
//!
//! [`SecurityContext`] replaces shared singletons: it is built once at
//! startup from the validated configuration plus the injected external
//! collaborators, and handed to the components that need it. Tests build
//! one per case, so no state crosses test boundaries.

use std::sync::Arc;

use allotrace_audit::{AuditLog, AuditStore, FileAuditStore, MemoryAuditStore};
use allotrace_config::{AppConfig, AuditBackend};
use allotrace_core::{ErrorSink, sink_for};
use allotrace_crypto::FieldCipher;

use crate::AuthResult;
use crate::acl::AclResolver;
use crate::consent::ConsentGate;
use crate::directory::GroupDirectory;
use crate::engine::AccessEngine;
use crate::error::AuthError;
use crate::storage::{ConsentStorage, PolicyStore};

/// The security components of a running instance, wired at startup.
pub struct SecurityContext {
    engine: AccessEngine,
    audit: Arc<AuditLog>,
    cipher: Arc<FieldCipher>,
    consent: ConsentGate,
    sink: Arc<dyn ErrorSink>,
}

impl std::fmt::Debug for SecurityContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityContext").finish_non_exhaustive()
    }
}

impl SecurityContext {
    /// Builds the context from validated configuration and the injected
    /// collaborators.
    ///
    /// The audit store backend is selected by `config.audit_backend`; the
    /// field-encryption key is derived once here and held for the
    /// context's lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the file backend is
    /// selected without a path, or [`AuthError::Storage`] if the audit
    /// backend cannot be opened.
    pub async fn initialize(
        config: &AppConfig,
        directory: Arc<dyn GroupDirectory>,
        policies: Arc<dyn PolicyStore>,
        consents: Arc<dyn ConsentStorage>,
    ) -> AuthResult<Self> {
        let store: Arc<dyn AuditStore> = match config.audit_backend {
            AuditBackend::Memory => Arc::new(MemoryAuditStore::new()),
            AuditBackend::File => {
                let path = config.audit_log_path.as_ref().ok_or_else(|| {
                    AuthError::configuration("file audit backend selected without a log path")
                })?;
                Arc::new(FileAuditStore::new(path))
            }
        };
        let audit = Arc::new(AuditLog::open(store).await?);

        let sink = sink_for(config.error_sink);
        let cipher = Arc::new(FieldCipher::new(&config.encryption_secret));
        let consent = ConsentGate::new(consents, Arc::clone(&audit));
        let engine = AccessEngine::new(
            Arc::clone(&audit),
            AclResolver::new(directory),
            policies,
            consent.clone(),
            Arc::clone(&sink),
        );

        Ok(Self {
            engine,
            audit,
            cipher,
            consent,
            sink,
        })
    }

    /// The access decision engine.
    #[must_use]
    pub fn engine(&self) -> &AccessEngine {
        &self.engine
    }

    /// The audit log.
    #[must_use]
    pub fn audit(&self) -> &Arc<AuditLog> {
        &self.audit
    }

    /// The field-encryption service.
    #[must_use]
    pub fn cipher(&self) -> &Arc<FieldCipher> {
        &self.cipher
    }

    /// The consent gate.
    #[must_use]
    pub fn consent(&self) -> &ConsentGate {
        &self.consent
    }

    /// The configured error sink.
    #[must_use]
    pub fn sink(&self) -> &Arc<dyn ErrorSink> {
        &self.sink
    }
}
