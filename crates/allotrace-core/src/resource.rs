//! References to platform resources.
//!
//! Every object an authorization decision can target (a case, a stored
//! document, a QA alert) is identified by a `ResourceRef` of the form
//! `"Type/id"`, e.g. `"Document/7f3c..."`. The core does not enumerate
//! resource kinds; the set of stored artifact types is owned by the
//! excluded CRUD layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Reference to a platform resource as `resource_type` + `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Resource type (e.g., "Case", "Document", "QaAlert").
    pub resource_type: String,

    /// Resource identifier, unique within its type.
    pub id: String,
}

impl ResourceRef {
    /// Create a reference from its parts.
    #[must_use]
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.id)
    }
}

impl FromStr for ResourceRef {
    type Err = CoreError;

    /// Parse a `"Type/id"` reference. Both parts must be non-empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((resource_type, id)) if !resource_type.is_empty() && !id.is_empty() => {
                Ok(Self::new(resource_type, id))
            }
            _ => Err(CoreError::invalid_resource_ref(s)),
        }
    }
}
