//! The access decision engine.
//!
//! [`AccessEngine::authorize`] combines the coarse role check, the
//! fine-grained ACL check for a targeted resource, and the consent check
//! for consent-gated permissions. Every call appends exactly one entry to
//! the audit log before the decision is returned; a decision that cannot
//! be audited is never returned as an allow.

use std::sync::Arc;

use tracing::debug;

use allotrace_audit::{AuditEvent, AuditLog, Decision};
use allotrace_core::{ErrorSink, ResourceRef};

use crate::AuthResult;
use crate::acl::AclResolver;
use crate::actor::Actor;
use crate::consent::ConsentGate;
use crate::error::AuthError;
use crate::rbac::{Permission, has_permission};
use crate::storage::PolicyStore;

// =============================================================================
// Decision
// =============================================================================

/// Why an authorization was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenyReason {
    /// Machine-readable code: `UNAUTHORIZED`, `FORBIDDEN`, or
    /// `CONSENT_REQUIRED`.
    pub code: &'static str,

    /// Human-readable explanation, safe to return to the caller.
    pub message: String,
}

impl DenyReason {
    /// No actor was resolved for the request.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self {
            code: "UNAUTHORIZED",
            message: "no authenticated actor".to_string(),
        }
    }

    /// The actor lacks the coarse permission or fine-grained grant.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self {
            code: "FORBIDDEN",
            message: message.into(),
        }
    }

    /// The action is gated on a missing or withdrawn consent.
    #[must_use]
    pub fn consent_required(message: impl Into<String>) -> Self {
        Self {
            code: "CONSENT_REQUIRED",
            message: message.into(),
        }
    }

    /// HTTP status the caller should translate this denial to.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self.code {
            "UNAUTHORIZED" => 401,
            _ => 403,
        }
    }
}

/// Outcome of an authorization call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// The action may proceed.
    Allow,
    /// The action is denied.
    Deny(DenyReason),
}

impl AccessDecision {
    /// Returns `true` if the action may proceed.
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

// =============================================================================
// Engine
// =============================================================================

/// The access decision engine.
///
/// Holds no per-request state: the role-permission map is immutable, the
/// audit store is append-only, and membership lookups are uncached, so
/// concurrent requests are fully independent.
#[derive(Clone)]
pub struct AccessEngine {
    audit: Arc<AuditLog>,
    resolver: AclResolver,
    policies: Arc<dyn PolicyStore>,
    consent: ConsentGate,
    sink: Arc<dyn ErrorSink>,
}

impl AccessEngine {
    /// Creates an engine over the given collaborators.
    #[must_use]
    pub fn new(
        audit: Arc<AuditLog>,
        resolver: AclResolver,
        policies: Arc<dyn PolicyStore>,
        consent: ConsentGate,
        sink: Arc<dyn ErrorSink>,
    ) -> Self {
        Self {
            audit,
            resolver,
            policies,
            consent,
            sink,
        }
    }

    /// Authorizes `permission` for `actor`, optionally targeting
    /// `resource`. For consent-gated permissions use
    /// [`AccessEngine::authorize_with_subject`]; a gated permission without
    /// a data subject is denied.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if a policy read, consent read, or
    /// the audit append fails. The decision is never returned unaudited.
    pub async fn authorize(
        &self,
        actor: Option<&Actor>,
        permission: Permission,
        resource: Option<&ResourceRef>,
    ) -> AuthResult<AccessDecision> {
        self.authorize_with_subject(actor, permission, resource, None)
            .await
    }

    /// Authorizes `permission`, checking the data subject's consent when
    /// the permission is consent-gated.
    ///
    /// Exactly one audit entry is appended per call, allow or deny, before
    /// the decision is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if a policy read, consent read, or
    /// the audit append fails (fail closed).
    pub async fn authorize_with_subject(
        &self,
        actor: Option<&Actor>,
        permission: Permission,
        resource: Option<&ResourceRef>,
        consent_subject: Option<&str>,
    ) -> AuthResult<AccessDecision> {
        let outcome = self
            .evaluate(actor, permission, resource, consent_subject)
            .await;

        let recorded = match &outcome {
            Ok(AccessDecision::Allow) => Decision::Allow,
            Ok(AccessDecision::Deny(reason)) => Decision::deny(reason.code),
            Err(e) => {
                self.sink.report("access-engine", e);
                Decision::deny("STORAGE")
            }
        };

        let mut event = AuditEvent::new(
            actor.map_or("anonymous", |a| a.identity.as_str()),
            format!("authorize:{permission}"),
            recorded,
        );
        if let Some(actor) = actor {
            event = event.with_role(actor.role.as_str());
        }
        if let Some(resource) = resource {
            event = event.with_resource(resource.clone());
        }

        if let Err(e) = self.audit.append(event).await {
            self.sink.report("audit-append", &e);
            return Err(e.into());
        }
        outcome
    }

    async fn evaluate(
        &self,
        actor: Option<&Actor>,
        permission: Permission,
        resource: Option<&ResourceRef>,
        consent_subject: Option<&str>,
    ) -> AuthResult<AccessDecision> {
        let Some(actor) = actor else {
            return Ok(AccessDecision::Deny(DenyReason::unauthenticated()));
        };

        if !has_permission(actor.role, permission) {
            debug!(identity = %actor.identity, role = %actor.role, %permission, "coarse check denied");
            return Ok(AccessDecision::Deny(DenyReason::forbidden(format!(
                "role '{}' does not grant '{permission}'",
                actor.role
            ))));
        }

        if let Some(resource) = resource {
            let policy = self.policies.get_policy(resource).await?;
            let allowed = self
                .resolver
                .can_access(
                    Some(&actor.identity),
                    policy.as_ref(),
                    permission.access_mode(),
                )
                .await;
            if !allowed {
                debug!(identity = %actor.identity, %resource, "acl check denied");
                return Ok(AccessDecision::Deny(DenyReason::forbidden(format!(
                    "'{}' has no {:?} grant on {resource}",
                    actor.identity,
                    permission.access_mode()
                ))));
            }
        }

        if let Some(consent_type) = permission.required_consent() {
            let Some(subject) = consent_subject else {
                return Ok(AccessDecision::Deny(DenyReason::consent_required(format!(
                    "'{permission}' requires a data subject with current {consent_type} consent"
                ))));
            };
            if !self.consent.has_current_consent(subject, consent_type).await? {
                return Ok(AccessDecision::Deny(DenyReason::consent_required(format!(
                    "no current {consent_type} consent from '{subject}'"
                ))));
            }
        }

        Ok(AccessDecision::Allow)
    }
}
