//! The field encryption service.

use aes_gcm::{
    AesGcm, Nonce,
    aead::{Aead, KeyInit, consts::U16},
    aes::Aes256,
};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::CryptoError;
use crate::field::EncryptedField;

/// Nonce size (128 bits).
const NONCE_SIZE: usize = 16;

/// GCM authentication tag size (128 bits).
const TAG_SIZE: usize = 16;

/// AES-256-GCM with a 128-bit nonce.
type FieldGcm = AesGcm<Aes256, U16>;

/// Authenticated symmetric encryption for sensitive fields.
///
/// The service is stateless aside from the derived key: the 256-bit key is
/// computed once from the configured secret and held for the service's
/// lifetime. Construct one instance at startup and inject it wherever
/// field encryption is needed.
///
/// # Example
///
/// ```
/// use allotrace_crypto::FieldCipher;
///
/// let cipher = FieldCipher::new("configured-secret");
/// let sealed = cipher.encrypt("1988-04-12").unwrap();
/// assert_eq!(cipher.decrypt(&sealed).unwrap(), "1988-04-12");
/// ```
#[derive(Clone)]
pub struct FieldCipher {
    cipher: FieldGcm,
}

impl FieldCipher {
    /// Derive the encryption key from the configured secret and build the
    /// cipher.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let key = Sha256::digest(secret.as_bytes());
        Self {
            cipher: FieldGcm::new(&key),
        }
    }

    /// Encrypt a plaintext field value.
    ///
    /// A fresh random nonce is generated on every call; nonces are never
    /// reused for the derived key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Encryption`] if the cipher fails.
    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedField, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let mut sealed = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::encryption("AES-GCM encryption failed"))?;

        // The aead API appends the tag to the ciphertext; split it back out
        // so the wire shape carries the tag explicitly.
        let tag = sealed.split_off(sealed.len() - TAG_SIZE);

        Ok(EncryptedField {
            ciphertext: BASE64.encode(&sealed),
            nonce: BASE64.encode(nonce_bytes),
            tag: BASE64.encode(&tag),
        })
    }

    /// Decrypt an encrypted field value.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Malformed`] if any component is not valid
    /// base64 or has the wrong length, and [`CryptoError::Integrity`] if
    /// the authentication tag does not verify. Corrupted plaintext is never
    /// returned.
    pub fn decrypt(&self, field: &EncryptedField) -> Result<String, CryptoError> {
        let ciphertext = BASE64
            .decode(&field.ciphertext)
            .map_err(|e| CryptoError::malformed(format!("invalid ciphertext base64: {e}")))?;
        let nonce_bytes = BASE64
            .decode(&field.nonce)
            .map_err(|e| CryptoError::malformed(format!("invalid nonce base64: {e}")))?;
        let tag = BASE64
            .decode(&field.tag)
            .map_err(|e| CryptoError::malformed(format!("invalid tag base64: {e}")))?;

        if nonce_bytes.len() != NONCE_SIZE {
            return Err(CryptoError::malformed(format!(
                "nonce must be {NONCE_SIZE} bytes, got {}",
                nonce_bytes.len()
            )));
        }
        if tag.len() != TAG_SIZE {
            return Err(CryptoError::malformed(format!(
                "tag must be {TAG_SIZE} bytes, got {}",
                tag.len()
            )));
        }

        let mut sealed = ciphertext;
        sealed.extend_from_slice(&tag);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, sealed.as_ref())
            .map_err(|_| CryptoError::integrity("authentication tag mismatch"))?;

        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::integrity("decrypted value is not valid UTF-8"))
    }
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher")
            .field("key", &"<redacted>")
            .finish()
    }
}
