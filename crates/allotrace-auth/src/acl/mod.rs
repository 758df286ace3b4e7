//! Per-object access-control lists.
//!
//! A stored artifact carries an [`AclPolicy`] (owner, visibility, rule
//! list). [`AclResolver::can_access`] evaluates a requested operation
//! against that policy, resolving group membership through the injected
//! [`crate::directory::GroupDirectory`]. All checks fail closed.

mod group;
mod policy;
mod resolver;

pub use group::AccessGroup;
pub use policy::{AccessMode, AclPolicy, AclRule, Visibility};
pub use resolver::AclResolver;
