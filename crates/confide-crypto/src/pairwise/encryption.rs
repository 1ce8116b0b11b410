//! Message encryption using `XChaCha20-Poly1305`
//!
//! All functions are pure - the nonce must be provided by the caller.
//! This enables deterministic testing; production callers draw the nonce
//! from the OS RNG.

use std::{fmt, str::FromStr};

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};

use super::{derivation::PairwiseKey, error::CipherError};

/// Size of the `XChaCha20` nonce (24 bytes)
pub const NONCE_SIZE: usize = 24;

/// Poly1305 tag size (16 bytes)
pub const TAG_SIZE: usize = 16;

/// Separator between the nonce and ciphertext segments of a serialized payload
pub const SEGMENT_DELIMITER: char = ':';

/// A sealed message: nonce plus ciphertext with trailing Poly1305 tag.
///
/// Serializes to `<nonce-hex>:<ciphertext-hex>` with lowercase hex, which is
/// all a reader needs besides the two participant identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    /// The 24-byte `XChaCha20` nonce
    pub nonce: [u8; NONCE_SIZE],
    /// The ciphertext including 16-byte Poly1305 tag
    pub ciphertext: Vec<u8>,
}

impl EncryptedPayload {
    /// Parse a serialized payload.
    ///
    /// Parsing is strict: exactly one delimiter, lowercase hex only, a
    /// 24-byte nonce, and at least a full tag of ciphertext. Every other
    /// shape is rejected, so any edit to a valid payload string fails here
    /// or at tag verification.
    ///
    /// # Errors
    ///
    /// - `MalformedPayload`: if any of the above does not hold
    pub fn parse(serialized: &str) -> Result<Self, CipherError> {
        let Some((nonce_hex, ciphertext_hex)) = serialized.split_once(SEGMENT_DELIMITER) else {
            return Err(CipherError::malformed("missing segment delimiter"));
        };

        let nonce_bytes = decode_segment(nonce_hex, "nonce")?;
        let nonce: [u8; NONCE_SIZE] = nonce_bytes.try_into().map_err(|bytes: Vec<u8>| {
            CipherError::malformed(format!(
                "nonce is {} bytes, expected {NONCE_SIZE}",
                bytes.len()
            ))
        })?;

        let ciphertext = decode_segment(ciphertext_hex, "ciphertext")?;
        if ciphertext.len() < TAG_SIZE {
            return Err(CipherError::malformed(format!(
                "ciphertext is {} bytes, shorter than the {TAG_SIZE}-byte tag",
                ciphertext.len()
            )));
        }

        Ok(Self { nonce, ciphertext })
    }
}

impl fmt::Display for EncryptedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{SEGMENT_DELIMITER}{}",
            hex::encode(self.nonce),
            hex::encode(&self.ciphertext)
        )
    }
}

impl FromStr for EncryptedPayload {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Encrypt `plaintext` under a pairwise key.
///
/// # Security
///
/// - Caller MUST supply a fresh nonce from a cryptographically secure RNG for
///   every call; reusing a nonce under the same key breaks confidentiality
/// - Authenticated encryption prevents undetected tampering
///
/// # Errors
///
/// - `EncryptionFailed`: if the AEAD rejects the input
pub fn seal(
    plaintext: &str,
    key: &PairwiseKey,
    nonce: [u8; NONCE_SIZE],
) -> Result<EncryptedPayload, CipherError> {
    let cipher = XChaCha20Poly1305::new(key.key().into());

    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
        .map_err(|_| CipherError::EncryptionFailed {
            reason: "AEAD encryption failed".to_string(),
        })?;

    Ok(EncryptedPayload { nonce, ciphertext })
}

/// Decrypt a payload under a pairwise key.
///
/// Returns the original plaintext.
///
/// # Errors
///
/// - `AuthenticationFailed`: if the tag does not verify (tamper, or the wrong
///   participant pair)
/// - `MalformedPayload`: if the decrypted bytes are not UTF-8
pub fn open(payload: &EncryptedPayload, key: &PairwiseKey) -> Result<String, CipherError> {
    let cipher = XChaCha20Poly1305::new(key.key().into());
    let nonce = XNonce::from_slice(&payload.nonce);

    let plaintext = cipher
        .decrypt(nonce, payload.ciphertext.as_slice())
        .map_err(|_| CipherError::AuthenticationFailed)?;

    String::from_utf8(plaintext)
        .map_err(|_| CipherError::malformed("decrypted message is not valid UTF-8"))
}

fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>, CipherError> {
    if !segment.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(CipherError::malformed(format!("{name} is not lowercase hex")));
    }
    hex::decode(segment).map_err(|e| CipherError::malformed(format!("{name}: {e}")))
}
