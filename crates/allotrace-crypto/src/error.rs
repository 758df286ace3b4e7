//! Encryption error types.

use thiserror::Error;

/// Errors that can occur during field encryption or decryption.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The authentication tag did not verify, or decryption failed.
    ///
    /// Always fatal for the operation. Corrupted or partial plaintext is
    /// never returned.
    #[error("Integrity error: {message}")]
    Integrity {
        /// Description of the integrity failure.
        message: String,
    },

    /// The encrypted blob is structurally invalid (bad encoding, wrong
    /// nonce or tag length).
    #[error("Malformed ciphertext blob: {message}")]
    Malformed {
        /// Description of the malformation.
        message: String,
    },

    /// The cipher itself failed during encryption.
    #[error("Encryption failed: {message}")]
    Encryption {
        /// Description of the failure.
        message: String,
    },
}

impl CryptoError {
    /// Creates a new `Integrity` error.
    #[must_use]
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }

    /// Creates a new `Malformed` error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates a new `Encryption` error.
    #[must_use]
    pub fn encryption(message: impl Into<String>) -> Self {
        Self::Encryption {
            message: message.into(),
        }
    }
}
