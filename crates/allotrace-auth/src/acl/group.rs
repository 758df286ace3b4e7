//! Access groups and their membership evaluation.

use serde::{Deserialize, Serialize};

use crate::AuthResult;
use crate::directory::GroupDirectory;

/// A typed collection an ACL rule grants access to.
///
/// A closed sum with one membership-evaluation arm per variant. Explicit
/// user lists and email domains resolve locally; named groups and
/// subscriber lists go through the injected [`GroupDirectory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum AccessGroup {
    /// An explicit list of identities.
    Users(Vec<String>),
    /// Everyone whose identity is an email address in the given domain.
    EmailDomain(String),
    /// Members of a named directory group.
    Group(String),
    /// Identities on a named subscriber list.
    Subscribers(String),
}

impl AccessGroup {
    /// Creates an explicit user-list group.
    #[must_use]
    pub fn users(identities: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Users(identities.into_iter().map(Into::into).collect())
    }

    /// Creates an email-domain group.
    #[must_use]
    pub fn email_domain(domain: impl Into<String>) -> Self {
        Self::EmailDomain(domain.into())
    }

    /// Creates a named directory group.
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self::Group(name.into())
    }

    /// Creates a subscriber-list group.
    #[must_use]
    pub fn subscribers(list: impl Into<String>) -> Self {
        Self::Subscribers(list.into())
    }

    /// Returns `true` if `identity` is a member of this group.
    ///
    /// # Errors
    ///
    /// Propagates directory failures for the [`AccessGroup::Group`] and
    /// [`AccessGroup::Subscribers`] variants; the resolver converts those
    /// to deny.
    pub async fn contains(
        &self,
        identity: &str,
        directory: &dyn GroupDirectory,
    ) -> AuthResult<bool> {
        match self {
            Self::Users(identities) => Ok(identities.iter().any(|u| u == identity)),
            Self::EmailDomain(domain) => Ok(identity
                .rsplit_once('@')
                .is_some_and(|(_, d)| d.eq_ignore_ascii_case(domain))),
            Self::Group(name) => directory.is_member(name, identity).await,
            Self::Subscribers(list) => directory.is_subscriber(list, identity).await,
        }
    }
}
