//! Storage abstractions for ACL policies and consent records.
//!
//! Production deployments back these with object-store metadata and a
//! database table; the in-memory implementations here serve tests and
//! development, the way the audit store ships a memory backend.

mod consent;
mod policy;

pub use consent::{ConsentRecord, ConsentStorage, ConsentType, MemoryConsentStore};
pub use policy::{MemoryPolicyStore, PolicyStore};
