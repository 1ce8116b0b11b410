//! Pairwise message encryption for direct conversations
//!
//! # Architecture
//!
//! ```text
//! Secret + Salt ──┐
//!                 ▼ HKDF-SHA256
//! CanonicalPair(a, b) ──▶ PairwiseKey
//!                            │
//!                            ▼ Seal (fresh 24-byte nonce)
//!                  XChaCha20-Poly1305 Ciphertext
//!                            │
//!                            ▼ Serialize
//!                  "<nonce-hex>:<ciphertext-hex>"
//! ```
//!
//! # Security Properties
//!
//! - Order Independence: both participants derive the same key
//! - Pair Isolation: each pair has its own key
//! - Tamper Detection: Poly1305 tag is verified before plaintext is returned

pub mod derivation;
pub mod encryption;
pub mod error;
pub mod secret;

pub use derivation::{CanonicalPair, PAIRWISE_KEY_SIZE, PairwiseKey, derive_pairwise_key};
pub use encryption::{EncryptedPayload, NONCE_SIZE, SEGMENT_DELIMITER, TAG_SIZE, open, seal};
pub use error::{CipherError, ConfigError};
pub use secret::{PLACEHOLDER_VALUES, SecretMaterial, is_placeholder};

/// Encrypt `plaintext` for the conversation between `a` and `b`.
///
/// Derives the pairwise key, seals under `nonce`, and returns the serialized
/// payload.
///
/// # Errors
///
/// - `EncryptionFailed`: if the AEAD rejects the input
pub fn encrypt_for_pair(
    material: &SecretMaterial,
    plaintext: &str,
    a: &str,
    b: &str,
    nonce: [u8; NONCE_SIZE],
) -> Result<String, CipherError> {
    let key = derive_pairwise_key(material, a, b);
    seal(plaintext, &key, nonce).map(|payload| payload.to_string())
}

/// Decrypt a serialized payload for the conversation between `a` and `b`.
///
/// Participant order does not matter.
///
/// # Errors
///
/// - `MalformedPayload`: if the payload cannot be parsed
/// - `AuthenticationFailed`: if the tag does not verify
pub fn decrypt_for_pair(
    material: &SecretMaterial,
    serialized: &str,
    a: &str,
    b: &str,
) -> Result<String, CipherError> {
    let payload = EncryptedPayload::parse(serialized)?;
    let key = derive_pairwise_key(material, a, b);
    open(&payload, &key)
}
