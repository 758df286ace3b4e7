//! End-to-end authorization flow through a wired `SecurityContext`.

use std::sync::Arc;

use allotrace_audit::{AuditFilter, DecisionKind};
use allotrace_auth::prelude::*;
use allotrace_auth::storage::{ConsentType, MemoryConsentStore, MemoryPolicyStore};
use allotrace_config::{AppConfig, AuditBackend};
use allotrace_core::{ResourceRef, SinkKind};

fn test_config() -> AppConfig {
    AppConfig {
        encryption_secret: "integration secret".to_string(),
        audit_backend: AuditBackend::Memory,
        audit_log_path: None,
        error_sink: SinkKind::Noop,
        log_filter: "info".to_string(),
    }
}

struct Platform {
    ctx: SecurityContext,
    policies: Arc<MemoryPolicyStore>,
    consents: Arc<MemoryConsentStore>,
}

async fn platform(directory: StaticDirectory) -> Platform {
    let policies = Arc::new(MemoryPolicyStore::new());
    let consents = Arc::new(MemoryConsentStore::new());
    let ctx = SecurityContext::initialize(
        &test_config(),
        Arc::new(directory),
        Arc::clone(&policies) as Arc<dyn PolicyStore>,
        Arc::clone(&consents) as Arc<dyn ConsentStorage>,
    )
    .await
    .unwrap();
    Platform {
        ctx,
        policies,
        consents,
    }
}

#[tokio::test]
async fn qa_staff_member_resolves_alert_on_team_owned_artifact() {
    let p = platform(StaticDirectory::new().with_member("qa-team", "qa-7")).await;
    let alert = ResourceRef::new("QaAlert", "a-42");
    p.policies
        .set_policy(
            &alert,
            AclPolicy::private("u1").with_rule(AccessGroup::group("qa-team"), AccessMode::Write),
        )
        .await
        .unwrap();

    let actor = Actor::new("qa-7", Role::QualityStaff);
    let decision = p
        .ctx
        .engine()
        .authorize(Some(&actor), Permission::ResolveQaAlert, Some(&alert))
        .await
        .unwrap();
    assert!(decision.is_allow());

    // Exactly one allow entry was appended for the call. Filter by the
    // acting identity so the query's own audit.query entry is excluded.
    let allows = p
        .ctx
        .audit()
        .query("auditor", &AuditFilter::new().actor("qa-7"))
        .await
        .unwrap();
    assert_eq!(allows.len(), 1);
    assert!(allows[0].decision.is_allow());
    assert_eq!(allows[0].action, "authorize:resolve-qa-alert");
    assert_eq!(allows[0].resource, Some(alert));
}

#[tokio::test]
async fn non_owner_without_rules_is_denied_and_audited() {
    let p = platform(StaticDirectory::new().with_member("qa-team", "qa-7")).await;
    let alert = ResourceRef::new("QaAlert", "a-42");
    p.policies
        .set_policy(&alert, AclPolicy::private("u2"))
        .await
        .unwrap();

    let actor = Actor::new("qa-7", Role::QualityStaff);
    let decision = p
        .ctx
        .engine()
        .authorize(Some(&actor), Permission::ResolveQaAlert, Some(&alert))
        .await
        .unwrap();
    let AccessDecision::Deny(reason) = decision else {
        panic!("expected deny");
    };
    assert_eq!(reason.code, "FORBIDDEN");
    assert_eq!(reason.http_status(), 403);

    let denials = p
        .ctx
        .audit()
        .query("auditor", &AuditFilter::new().decision(DecisionKind::Deny))
        .await
        .unwrap();
    assert_eq!(denials.len(), 1);
    assert_eq!(denials[0].actor, "qa-7");
}

#[tokio::test]
async fn unauthenticated_caller_is_denied_without_acl_resolution() {
    let p = platform(StaticDirectory::new()).await;
    let case = ResourceRef::new("Case", "c-1");
    // Deliberately no policy: the denial must be UNAUTHORIZED, showing the
    // engine never reached the resolver's fail-closed branch.
    let decision = p
        .ctx
        .engine()
        .authorize(None, Permission::ViewCase, Some(&case))
        .await
        .unwrap();
    let AccessDecision::Deny(reason) = decision else {
        panic!("expected deny");
    };
    assert_eq!(reason.code, "UNAUTHORIZED");
    assert_eq!(reason.http_status(), 401);

    let entries = p
        .ctx
        .audit()
        .query("auditor", &AuditFilter::new().actor("anonymous"))
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn consent_lifecycle_gates_recovery_scheduling() {
    let p = platform(StaticDirectory::new()).await;
    let actor = Actor::new("coord-1", Role::OpoCoordinator);

    // Grant, authorize, withdraw, authorize again.
    p.consents
        .record_grant("donor-9", ConsentType::OrganRecovery)
        .await
        .unwrap();
    let decision = p
        .ctx
        .engine()
        .authorize_with_subject(
            Some(&actor),
            Permission::ScheduleRecovery,
            None,
            Some("donor-9"),
        )
        .await
        .unwrap();
    assert!(decision.is_allow());

    p.consents
        .withdraw("donor-9", ConsentType::OrganRecovery)
        .await
        .unwrap();
    let decision = p
        .ctx
        .engine()
        .authorize_with_subject(
            Some(&actor),
            Permission::ScheduleRecovery,
            None,
            Some("donor-9"),
        )
        .await
        .unwrap();
    let AccessDecision::Deny(reason) = decision else {
        panic!("expected deny");
    };
    assert_eq!(reason.code, "CONSENT_REQUIRED");

    // History keeps the withdrawn grant.
    let history = p
        .consents
        .history("donor-9", ConsentType::OrganRecovery)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].withdrawn);

    // The chain over the whole session verifies.
    assert!(p.ctx.audit().verify_chain(None).await.unwrap().is_valid());
}

#[tokio::test]
async fn audit_queries_are_themselves_audited() {
    let p = platform(StaticDirectory::new()).await;
    let actor = Actor::new("quality-2", Role::QualityStaff);
    p.ctx
        .engine()
        .authorize(Some(&actor), Permission::ViewAuditLog, None)
        .await
        .unwrap();

    p.ctx
        .audit()
        .query("quality-2", &AuditFilter::new())
        .await
        .unwrap();
    let reads = p
        .ctx
        .audit()
        .query("auditor", &AuditFilter::new().actor("quality-2"))
        .await
        .unwrap();
    assert!(reads.iter().any(|e| e.action == "audit.query"));
}
