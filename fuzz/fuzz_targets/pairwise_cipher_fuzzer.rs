//! Fuzz target for pairwise key derivation and encryption
//!
//! Tests HKDF pair derivation and XChaCha20-Poly1305 sealing under adversarial
//! inputs.
//!
//! # Strategy
//!
//! - Arbitrary participant identifiers (empty, equal, prefix-related)
//! - Arbitrary secrets and salts (validation may reject them)
//! - Arbitrary plaintexts and nonces
//! - Single-byte corruption of the serialized payload
//!
//! # Invariants
//!
//! - Derivation is deterministic and order independent
//! - Encrypt/decrypt roundtrip succeeds in either participant order
//! - Corrupted payloads fail decryption
//! - Nothing panics

#![no_main]

use arbitrary::Arbitrary;
use confide_crypto::{
    decrypt_for_pair, derive_pairwise_key, encrypt_for_pair, SecretMaterial, NONCE_SIZE,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
struct PairwiseScenario {
    secret: String,
    salt: String,
    a: String,
    b: String,
    plaintext: String,
    nonce: [u8; NONCE_SIZE],
    corrupt_at: usize,
}

fuzz_target!(|scenario: PairwiseScenario| {
    // INVARIANT 1: Validation never panics; invalid material stops here
    let Ok(material) = SecretMaterial::new(scenario.secret, scenario.salt) else {
        return;
    };

    // INVARIANT 2: Derivation is deterministic and order independent
    let forward = derive_pairwise_key(&material, &scenario.a, &scenario.b);
    let reverse = derive_pairwise_key(&material, &scenario.b, &scenario.a);
    assert_eq!(forward.key(), reverse.key(), "derivation must be order independent");

    // INVARIANT 3: Roundtrip succeeds in either order
    let (a, b) = (scenario.a.as_str(), scenario.b.as_str());
    let payload = encrypt_for_pair(&material, &scenario.plaintext, a, b, scenario.nonce)
        .expect("encryption of a string cannot fail");
    let forward_text = decrypt_for_pair(&material, &payload, &scenario.a, &scenario.b);
    let reverse_text = decrypt_for_pair(&material, &payload, &scenario.b, &scenario.a);
    assert_eq!(forward_text.as_deref(), Ok(scenario.plaintext.as_str()));
    assert_eq!(reverse_text.as_deref(), Ok(scenario.plaintext.as_str()));

    // INVARIANT 4: Corrupting any byte of the payload is detected
    let mut corrupted = payload.into_bytes();
    let index = scenario.corrupt_at % corrupted.len();
    corrupted[index] = if corrupted[index] == b'0' { b'1' } else { b'0' };
    let corrupted = String::from_utf8(corrupted).expect("payload is ASCII");
    assert!(decrypt_for_pair(&material, &corrupted, &scenario.a, &scenario.b).is_err());
});
