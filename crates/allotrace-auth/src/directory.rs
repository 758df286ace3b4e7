//! Group-membership directory.
//!
//! Membership resolution is an external capability: production backs it
//! with an identity directory, tests and development use
//! [`StaticDirectory`]. Lookups are I/O-bound and must not be cached across
//! requests, since membership can change between them.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::AuthResult;

/// Directory answering group-membership and subscriber-list queries.
#[async_trait]
pub trait GroupDirectory: Send + Sync {
    /// Returns `true` if `identity` is a member of the named group.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Storage`] if the directory cannot be
    /// reached. Callers in the access path convert failures to deny.
    async fn is_member(&self, group: &str, identity: &str) -> AuthResult<bool>;

    /// Returns `true` if `identity` is on the named subscriber list.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Storage`] if the directory cannot be
    /// reached.
    async fn is_subscriber(&self, list: &str, identity: &str) -> AuthResult<bool>;
}

/// In-memory directory with fixed membership. Tests and development.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    groups: HashMap<String, HashSet<String>>,
    subscribers: HashMap<String, HashSet<String>>,
}

impl StaticDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `identity` to the named group.
    #[must_use]
    pub fn with_member(mut self, group: impl Into<String>, identity: impl Into<String>) -> Self {
        self.groups
            .entry(group.into())
            .or_default()
            .insert(identity.into());
        self
    }

    /// Adds `identity` to the named subscriber list.
    #[must_use]
    pub fn with_subscriber(mut self, list: impl Into<String>, identity: impl Into<String>) -> Self {
        self.subscribers
            .entry(list.into())
            .or_default()
            .insert(identity.into());
        self
    }
}

#[async_trait]
impl GroupDirectory for StaticDirectory {
    async fn is_member(&self, group: &str, identity: &str) -> AuthResult<bool> {
        Ok(self
            .groups
            .get(group)
            .is_some_and(|members| members.contains(identity)))
    }

    async fn is_subscriber(&self, list: &str, identity: &str) -> AuthResult<bool> {
        Ok(self
            .subscribers
            .get(list)
            .is_some_and(|members| members.contains(identity)))
    }
}
