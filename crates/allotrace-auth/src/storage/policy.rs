//! ACL policy storage.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use allotrace_core::ResourceRef;

use crate::AuthResult;
use crate::acl::AclPolicy;

/// Store of per-object ACL policies.
///
/// Backed in production by metadata on the object in the external blob
/// store; consumed here as an abstract capability.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Fetches the policy for `resource`, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Storage`] if the backend cannot be read.
    /// Callers must treat that as deny, not as "no policy".
    async fn get_policy(&self, resource: &ResourceRef) -> AuthResult<Option<AclPolicy>>;

    /// Writes (or replaces) the policy for `resource`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Storage`] if the backend rejects the
    /// write.
    async fn set_policy(&self, resource: &ResourceRef, policy: AclPolicy) -> AuthResult<()>;
}

/// In-memory policy store. Tests and development.
#[derive(Debug, Default)]
pub struct MemoryPolicyStore {
    policies: RwLock<HashMap<ResourceRef, AclPolicy>>,
}

impl MemoryPolicyStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PolicyStore for MemoryPolicyStore {
    async fn get_policy(&self, resource: &ResourceRef) -> AuthResult<Option<AclPolicy>> {
        Ok(self.policies.read().await.get(resource).cloned())
    }

    async fn set_policy(&self, resource: &ResourceRef, policy: AclPolicy) -> AuthResult<()> {
        self.policies.write().await.insert(resource.clone(), policy);
        Ok(())
    }
}
