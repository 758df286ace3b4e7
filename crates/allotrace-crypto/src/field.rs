//! The canonical encrypted-field wire shape.

use serde::{Deserialize, Serialize};

/// An encrypted field value as persisted at rest.
///
/// Ciphertext, nonce, and authentication tag travel together; storing the
/// ciphertext without its tag or nonce would make the value undecryptable,
/// so the three fields are only ever produced and consumed as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedField {
    /// Base64-encoded ciphertext (without the authentication tag).
    pub ciphertext: String,

    /// Base64-encoded 128-bit nonce, unique per encryption call.
    pub nonce: String,

    /// Base64-encoded 128-bit GCM authentication tag.
    pub tag: String,
}
