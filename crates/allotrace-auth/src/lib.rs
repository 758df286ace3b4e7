//! # allotrace-auth
//!
//! Authorization core for the AlloTrace traceability platform.
//!
//! This crate provides:
//! - The static role/permission model (RBAC)
//! - The access decision engine combining RBAC, per-object ACLs, and consent
//! - Per-object ACL policies and their resolver
//! - The consent gate for consent-gated action classes
//! - Storage and directory traits for the external collaborators
//! - The `SecurityContext` wiring everything together at startup
//!
//! ## Overview
//!
//! An inbound request carries an authenticated [`Actor`] (role + identity)
//! resolved by the excluded HTTP layer. [`AccessEngine::authorize`] performs
//! the coarse role check, the fine-grained ACL check for a targeted
//! resource, and the consent check for consent-gated permissions; every
//! decision, allow or deny, is appended to the tamper-evident audit log
//! before the decision is returned.
//!
//! ## Modules
//!
//! - [`rbac`] - Roles, permissions, and the role-permission map
//! - [`actor`] - The authenticated actor
//! - [`acl`] - ACL policies, access groups, and the resolver
//! - [`directory`] - Group-membership directory trait
//! - [`storage`] - Storage traits for ACL policies and consent records
//! - [`consent`] - The consent gate
//! - [`engine`] - The access decision engine
//! - [`context`] - Startup wiring (`SecurityContext`)
//! - [`error`] - Authorization error types

pub mod acl;
pub mod actor;
pub mod consent;
pub mod context;
pub mod directory;
pub mod engine;
pub mod error;
pub mod rbac;
pub mod storage;

pub use acl::{AccessGroup, AccessMode, AclPolicy, AclResolver, AclRule, Visibility};
pub use actor::Actor;
pub use consent::ConsentGate;
pub use context::SecurityContext;
pub use directory::{GroupDirectory, StaticDirectory};
pub use engine::{AccessDecision, AccessEngine, DenyReason};
pub use error::AuthError;
pub use rbac::{Permission, Role, has_permission, permissions_for};
pub use storage::{
    ConsentRecord, ConsentStorage, ConsentType, MemoryConsentStore, MemoryPolicyStore, PolicyStore,
};

/// Type alias for authorization results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use allotrace_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::acl::{AccessGroup, AccessMode, AclPolicy, AclResolver, AclRule, Visibility};
    pub use crate::actor::Actor;
    pub use crate::consent::ConsentGate;
    pub use crate::context::SecurityContext;
    pub use crate::directory::{GroupDirectory, StaticDirectory};
    pub use crate::engine::{AccessDecision, AccessEngine, DenyReason};
    pub use crate::error::AuthError;
    pub use crate::rbac::{Permission, Role, has_permission, permissions_for};
    pub use crate::storage::{
        ConsentRecord, ConsentStorage, ConsentType, MemoryConsentStore, MemoryPolicyStore,
        PolicyStore,
    };
}
