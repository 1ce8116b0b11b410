//! Environment abstraction for nonce randomness.
//!
//! Decouples the cipher from the OS RNG so tests can pin or count nonces,
//! while production uses real cryptographic entropy.

use confide_crypto::NONCE_SIZE;
use thiserror::Error;

/// The randomness source could not produce bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("entropy unavailable: {reason}")]
pub struct EntropyError {
    /// Reason reported by the source
    pub reason: String,
}

/// Abstract environment providing randomness.
///
/// # Safety
///
/// Implementations MUST guarantee:
///
/// - `random_bytes()` uses cryptographically secure entropy in production
/// - Production sources never return the same nonce twice in practice
pub trait Environment: Clone + Send + Sync + 'static {
    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError>;

    /// Generates a fresh nonce for one encryption.
    fn nonce(&self) -> Result<[u8; NONCE_SIZE], EntropyError> {
        let mut nonce = [0u8; NONCE_SIZE];
        self.random_bytes(&mut nonce)?;
        Ok(nonce)
    }
}

/// Production environment using the OS cryptographic RNG.
///
/// Uses getrandom, which provides OS-level randomness (e.g. `getrandom(2)` on
/// Linux, `BCryptGenRandom` on Windows). RNG failure is reported instead of
/// panicking so the send path can apply its plaintext fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError> {
        getrandom::fill(buffer).map_err(|e| EntropyError { reason: e.to_string() })
    }
}
