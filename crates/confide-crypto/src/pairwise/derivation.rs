//! Pairwise key derivation using HKDF

use std::fmt;

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroize;

use super::secret::SecretMaterial;

/// Label used for pairwise key derivation
const PAIRWISE_KEY_LABEL: &[u8] = b"confidePairwiseV1";

/// Size of a pairwise key (XChaCha20-Poly1305 key size)
pub const PAIRWISE_KEY_SIZE: usize = 32;

/// An unordered pair of conversation participants.
///
/// Identifiers are sorted by byte order on construction, so
/// `CanonicalPair::new(a, b) == CanonicalPair::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalPair<'a> {
    first: &'a str,
    second: &'a str,
}

impl<'a> CanonicalPair<'a> {
    /// Sort two participant identifiers into canonical order.
    pub fn new(a: &'a str, b: &'a str) -> Self {
        if a <= b { Self { first: a, second: b } } else { Self { first: b, second: a } }
    }

    /// Lower identifier in byte order.
    pub fn first(&self) -> &'a str {
        self.first
    }

    /// Higher identifier in byte order.
    pub fn second(&self) -> &'a str {
        self.second
    }

    /// HKDF info: label || len(first) || first || len(second) || second.
    ///
    /// Lengths are u32 big-endian so that no two pairs share an encoding.
    fn info(&self) -> Vec<u8> {
        let mut info = Vec::with_capacity(
            PAIRWISE_KEY_LABEL.len() + 8 + self.first.len() + self.second.len(),
        );
        info.extend_from_slice(PAIRWISE_KEY_LABEL);
        for id in [self.first, self.second] {
            info.extend_from_slice(&(id.len() as u32).to_be_bytes());
            info.extend_from_slice(id.as_bytes());
        }
        info
    }
}

/// Symmetric key for one unordered participant pair.
///
/// Derived fresh for every operation and zeroized on drop.
#[derive(Clone)]
pub struct PairwiseKey {
    key: [u8; PAIRWISE_KEY_SIZE],
}

impl PairwiseKey {
    /// 32-byte symmetric key for XChaCha20-Poly1305 AEAD.
    pub fn key(&self) -> &[u8; PAIRWISE_KEY_SIZE] {
        &self.key
    }
}

impl fmt::Debug for PairwiseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PairwiseKey(<redacted>)")
    }
}

impl Drop for PairwiseKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

/// Derive the pairwise key for a conversation between `a` and `b`.
///
/// The secret is the HKDF input keying material and the configured salt is
/// the HKDF salt. The canonical pair goes into the info parameter.
///
/// # Security
///
/// - Order independent: `derive(a, b) == derive(b, a)`
/// - Deterministic: same inputs always produce same output
/// - Different pairs produce unrelated keys without knowledge of the secret
pub fn derive_pairwise_key(material: &SecretMaterial, a: &str, b: &str) -> PairwiseKey {
    let hkdf = Hkdf::<Sha256>::new(Some(material.salt()), material.secret());
    let info = CanonicalPair::new(a, b).info();

    let mut key = [0u8; PAIRWISE_KEY_SIZE];
    let Ok(()) = hkdf.expand(&info, &mut key) else {
        unreachable!("32 bytes is a valid HKDF-SHA256 output length");
    };

    PairwiseKey { key }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material() -> SecretMaterial {
        SecretMaterial::new("s3cret", "NaCl").unwrap()
    }

    #[test]
    fn canonical_pair_sorts_identifiers() {
        let pair = CanonicalPair::new("user2", "user1");
        assert_eq!(pair.first(), "user1");
        assert_eq!(pair.second(), "user2");
        assert_eq!(pair, CanonicalPair::new("user1", "user2"));
    }

    #[test]
    fn derive_is_order_independent() {
        let material = material();
        assert_eq!(
            derive_pairwise_key(&material, "user1", "user2").key(),
            derive_pairwise_key(&material, "user2", "user1").key()
        );
    }

    #[test]
    fn derive_is_deterministic() {
        let key1 = derive_pairwise_key(&material(), "user1", "user2");
        let key2 = derive_pairwise_key(&material(), "user1", "user2");
        assert_eq!(key1.key(), key2.key(), "same inputs must produce same output");
    }

    #[test]
    fn different_pairs_produce_different_keys() {
        let material = material();
        let key_12 = derive_pairwise_key(&material, "user1", "user2");
        let key_13 = derive_pairwise_key(&material, "user1", "user3");
        assert_ne!(key_12.key(), key_13.key(), "different pairs must produce different keys");
    }

    #[test]
    fn identifier_boundaries_are_unambiguous() {
        let material = material();
        let key_a = derive_pairwise_key(&material, "ab", "c");
        let key_b = derive_pairwise_key(&material, "a", "bc");
        assert_ne!(key_a.key(), key_b.key());
    }

    #[test]
    fn different_secrets_produce_different_keys() {
        let other = SecretMaterial::new("0ther-s3cret", "NaCl").unwrap();
        assert_ne!(
            derive_pairwise_key(&material(), "user1", "user2").key(),
            derive_pairwise_key(&other, "user1", "user2").key()
        );
    }

    #[test]
    fn different_salts_produce_different_keys() {
        let other = SecretMaterial::new("s3cret", "KCl").unwrap();
        assert_ne!(
            derive_pairwise_key(&material(), "user1", "user2").key(),
            derive_pairwise_key(&other, "user1", "user2").key()
        );
    }

    #[test]
    fn same_participant_twice_is_allowed() {
        let key = derive_pairwise_key(&material(), "user1", "user1");
        assert_eq!(key.key().len(), PAIRWISE_KEY_SIZE);
    }

    #[test]
    fn debug_does_not_print_key() {
        let key = derive_pairwise_key(&material(), "user1", "user2");
        assert_eq!(format!("{key:?}"), "PairwiseKey(<redacted>)");
    }
}
