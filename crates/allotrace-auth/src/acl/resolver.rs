//! The ACL resolver.

use std::sync::Arc;

use tracing::warn;

use super::policy::{AccessMode, AclPolicy, Visibility};
use crate::directory::GroupDirectory;

/// Evaluates a requested operation against a per-object policy.
///
/// Holds only the directory handle; no per-call state and no membership
/// caching (membership can change between requests).
#[derive(Clone)]
pub struct AclResolver {
    directory: Arc<dyn GroupDirectory>,
}

impl AclResolver {
    /// Creates a resolver backed by the given directory.
    #[must_use]
    pub fn new(directory: Arc<dyn GroupDirectory>) -> Self {
        Self { directory }
    }

    /// Decides whether `identity` may perform `requested` under `policy`.
    ///
    /// Rules, in order, short-circuiting:
    /// 1. No policy → deny.
    /// 2. Public visibility grants read to everyone (never write).
    /// 3. No identity → deny.
    /// 4. The owner has unconditional full access.
    /// 5. Any rule whose group contains the identity and whose granted mode
    ///    satisfies the request → allow.
    /// 6. Otherwise deny.
    ///
    /// A directory lookup failure is logged and treated as non-membership,
    /// so an unreachable directory denies rather than crashing the request
    /// or defaulting to allow.
    pub async fn can_access(
        &self,
        identity: Option<&str>,
        policy: Option<&AclPolicy>,
        requested: AccessMode,
    ) -> bool {
        let Some(policy) = policy else {
            return false;
        };
        if policy.visibility == Visibility::Public && requested == AccessMode::Read {
            return true;
        }
        let Some(identity) = identity else {
            return false;
        };
        if identity == policy.owner {
            return true;
        }
        for rule in &policy.rules {
            if !requested.satisfied_by(rule.mode) {
                continue;
            }
            match rule.group.contains(identity, self.directory.as_ref()).await {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => {
                    warn!(identity, error = %e, "group membership lookup failed, denying");
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuthError;
    use crate::AuthResult;
    use crate::acl::AccessGroup;
    use crate::directory::StaticDirectory;
    use async_trait::async_trait;

    fn resolver(directory: StaticDirectory) -> AclResolver {
        AclResolver::new(Arc::new(directory))
    }

    #[tokio::test]
    async fn test_no_policy_fails_closed() {
        let r = resolver(StaticDirectory::new());
        assert!(!r.can_access(Some("u1"), None, AccessMode::Read).await);
        assert!(!r.can_access(Some("u1"), None, AccessMode::Write).await);
        assert!(!r.can_access(None, None, AccessMode::Read).await);
    }

    #[tokio::test]
    async fn test_public_grants_read_never_write() {
        let r = resolver(StaticDirectory::new());
        let policy = AclPolicy::public("u1");
        assert!(r.can_access(None, Some(&policy), AccessMode::Read).await);
        assert!(r.can_access(Some("u9"), Some(&policy), AccessMode::Read).await);
        assert!(!r.can_access(Some("u9"), Some(&policy), AccessMode::Write).await);
        // The owner still writes.
        assert!(r.can_access(Some("u1"), Some(&policy), AccessMode::Write).await);
    }

    #[tokio::test]
    async fn test_owner_override_ignores_rules() {
        let r = resolver(StaticDirectory::new());
        let policy = AclPolicy::private("u1");
        assert!(r.can_access(Some("u1"), Some(&policy), AccessMode::Read).await);
        assert!(r.can_access(Some("u1"), Some(&policy), AccessMode::Write).await);
        assert!(!r.can_access(Some("u2"), Some(&policy), AccessMode::Read).await);
    }

    #[tokio::test]
    async fn test_anonymous_denied_on_private() {
        let r = resolver(StaticDirectory::new());
        let policy = AclPolicy::private("u1");
        assert!(!r.can_access(None, Some(&policy), AccessMode::Read).await);
    }

    #[tokio::test]
    async fn test_rule_match_respects_mode_compatibility() {
        let r = resolver(StaticDirectory::new().with_member("qa-team", "u2"));
        let write_policy =
            AclPolicy::private("u1").with_rule(AccessGroup::group("qa-team"), AccessMode::Write);
        // Write grant satisfies both write and read.
        assert!(r.can_access(Some("u2"), Some(&write_policy), AccessMode::Write).await);
        assert!(r.can_access(Some("u2"), Some(&write_policy), AccessMode::Read).await);

        let read_policy =
            AclPolicy::private("u1").with_rule(AccessGroup::group("qa-team"), AccessMode::Read);
        // Read grant never satisfies write.
        assert!(r.can_access(Some("u2"), Some(&read_policy), AccessMode::Read).await);
        assert!(!r.can_access(Some("u2"), Some(&read_policy), AccessMode::Write).await);

        // Non-member denied either way.
        assert!(!r.can_access(Some("u3"), Some(&write_policy), AccessMode::Read).await);
    }

    struct FailingDirectory;

    #[async_trait]
    impl GroupDirectory for FailingDirectory {
        async fn is_member(&self, _group: &str, _identity: &str) -> AuthResult<bool> {
            Err(AuthError::storage("directory unreachable"))
        }

        async fn is_subscriber(&self, _list: &str, _identity: &str) -> AuthResult<bool> {
            Err(AuthError::storage("directory unreachable"))
        }
    }

    #[tokio::test]
    async fn test_directory_failure_denies() {
        let r = AclResolver::new(Arc::new(FailingDirectory));
        let policy =
            AclPolicy::private("u1").with_rule(AccessGroup::group("qa-team"), AccessMode::Write);
        assert!(!r.can_access(Some("u2"), Some(&policy), AccessMode::Read).await);
        // Owner override is unaffected by directory health.
        assert!(r.can_access(Some("u1"), Some(&policy), AccessMode::Write).await);
    }

    #[tokio::test]
    async fn test_later_rule_still_matches_after_failure() {
        // One failing variant followed by a local user-list match: the
        // resolver keeps scanning and allows on the later rule.
        let r = AclResolver::new(Arc::new(FailingDirectory));
        let policy = AclPolicy::private("u1")
            .with_rule(AccessGroup::group("qa-team"), AccessMode::Write)
            .with_rule(AccessGroup::users(["u2"]), AccessMode::Write);
        assert!(r.can_access(Some("u2"), Some(&policy), AccessMode::Write).await);
    }
}
