//! ACL policy types.

use serde::{Deserialize, Serialize};

use super::group::AccessGroup;

// =============================================================================
// Access Mode
// =============================================================================

/// The operation a caller requests on a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Read or download the object.
    Read,
    /// Create, modify, or act on the object.
    Write,
}

impl AccessMode {
    /// Returns `true` if a rule granting `granted` satisfies a request for
    /// `self`. Write implies read; read never satisfies write.
    #[must_use]
    pub fn satisfied_by(self, granted: AccessMode) -> bool {
        match self {
            AccessMode::Read => true,
            AccessMode::Write => granted == AccessMode::Write,
        }
    }
}

// =============================================================================
// Policy
// =============================================================================

/// Who may discover the object without an explicit grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Anyone may read; writes still require owner or an explicit rule.
    Public,
    /// Access only through ownership or an ACL rule.
    #[default]
    Private,
}

/// One grant: members of `group` get `mode` access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclRule {
    /// The group whose members the grant applies to.
    pub group: AccessGroup,

    /// The granted access mode.
    pub mode: AccessMode,
}

impl AclRule {
    /// Creates a rule granting `mode` to members of `group`.
    #[must_use]
    pub fn new(group: AccessGroup, mode: AccessMode) -> Self {
        Self { group, mode }
    }
}

/// The per-object access policy, persisted as object metadata.
///
/// The owner always has full access regardless of the rule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclPolicy {
    /// Identity of the object's owner.
    pub owner: String,

    /// Visibility flag.
    #[serde(default)]
    pub visibility: Visibility,

    /// Ordered grant list. Order does not affect the outcome: every rule
    /// grants, so any match allows.
    #[serde(default)]
    pub rules: Vec<AclRule>,
}

impl AclPolicy {
    /// Creates a private policy owned by `owner` with no rules.
    #[must_use]
    pub fn private(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            visibility: Visibility::Private,
            rules: Vec::new(),
        }
    }

    /// Creates a public policy owned by `owner` with no rules.
    #[must_use]
    pub fn public(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            visibility: Visibility::Public,
            rules: Vec::new(),
        }
    }

    /// Appends a rule.
    #[must_use]
    pub fn with_rule(mut self, group: AccessGroup, mode: AccessMode) -> Self {
        self.rules.push(AclRule::new(group, mode));
        self
    }
}
