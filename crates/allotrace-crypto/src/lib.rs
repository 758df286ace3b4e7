//! # allotrace-crypto
//!
//! Field-level encryption for sensitive values persisted at rest
//! (donor identifiers, dates, addresses).
//!
//! Authenticated encryption uses AES-256-GCM with a fresh random 128-bit
//! nonce per call. The 256-bit key is derived once from a configured secret
//! via SHA-256 and held for the lifetime of the [`FieldCipher`].
//!
//! The canonical wire shape is [`EncryptedField`]: ciphertext, nonce, and
//! authentication tag as separate base64 fields, always produced and
//! consumed as a unit. There is no alternative packed representation.
//!
//! ## Modules
//!
//! - [`error`] - Encryption error types
//! - [`field`] - The `EncryptedField` wire shape
//! - [`service`] - The `FieldCipher` encryption service

pub mod error;
pub mod field;
pub mod service;

pub use error::CryptoError;
pub use field::EncryptedField;
pub use service::FieldCipher;

/// Type alias for encryption results.
pub type CryptoResult<T> = Result<T, CryptoError>;
