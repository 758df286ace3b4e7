//! The authenticated actor handed to the engine by the request layer.

use serde::{Deserialize, Serialize};

use crate::rbac::Role;

/// An authenticated actor: an identity and the role it holds.
///
/// Resolved upstream by the request layer (session or token validation is
/// not this crate's concern) and passed to
/// [`crate::engine::AccessEngine::authorize`]. Absence of an actor is
/// modeled as `Option<&Actor>` at the call site, not as a sentinel value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable identity, e.g. a user id or email address.
    pub identity: String,

    /// The role this actor holds.
    pub role: Role,
}

impl Actor {
    /// Creates an actor with the given identity and role.
    #[must_use]
    pub fn new(identity: impl Into<String>, role: Role) -> Self {
        Self {
            identity: identity.into(),
            role,
        }
    }
}
