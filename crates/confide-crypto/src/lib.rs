//! Confide Cryptographic Primitives
//!
//! Cryptographic building blocks for encrypting direct messages at rest. Pure
//! functions with deterministic outputs. Callers provide the nonce so tests
//! can pin it.
//!
//! # Key Lifecycle
//!
//! Every conversation between two users has one symmetric key, derived on
//! demand from the process-wide secret, the configured salt, and the two
//! participant identifiers in canonical (sorted) order. Keys are never
//! persisted; each encrypt or decrypt call derives the key again and
//! zeroizes it afterwards.
//!
//! ```text
//! Secret Material (secret, salt)
//!        │
//!        ▼
//! HKDF(canonical pair) → Pairwise Key
//!        │
//!        ▼
//! AEAD Encryption (random nonce) → "<nonce>:<ciphertext>"
//! ```
//!
//! # Security
//!
//! Order Independence:
//! - Identifiers are sorted before derivation, so the sender and receiver of
//!   any message derive the same key
//!
//! Semantic Security:
//! - A fresh 24-byte random nonce per encryption means identical plaintexts
//!   never produce identical payloads
//!
//! Authenticity:
//! - XChaCha20-Poly1305 AEAD provides tamper-proof encryption
//! - Failed authentication tag -> reject message
//! - Decrypting with the wrong participant pair fails the same way
//!
//! Not provided: forward secrecy, key rotation. Compromise of the secret and
//! salt exposes every stored conversation.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod pairwise;

pub use pairwise::{
    CanonicalPair, CipherError, ConfigError, EncryptedPayload, NONCE_SIZE, PairwiseKey,
    SecretMaterial, decrypt_for_pair, derive_pairwise_key, encrypt_for_pair, open, seal,
};
