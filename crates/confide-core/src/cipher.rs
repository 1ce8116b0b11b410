//! The injectable pairwise message cipher.
//!
//! Constructed once at process start from a [`CipherConfig`], then shared
//! immutably with every request path. Holds no mutable state, so concurrent
//! calls need no coordination.

use confide_crypto::{CipherError, ConfigError, SecretMaterial, decrypt_for_pair, encrypt_for_pair};

use crate::{
    config::{CipherConfig, Deployment},
    env::{Environment, SystemEnv},
};

/// Pairwise message cipher.
///
/// # Invariants
///
/// - Secret material is validated exactly once, at construction
/// - A cipher built without valid material fails every operation with
///   `CipherError::Configuration`, never with another error type
#[derive(Debug, Clone)]
pub struct MessageCipher<E: Environment = SystemEnv> {
    material: Result<SecretMaterial, ConfigError>,
    env: E,
}

impl MessageCipher<SystemEnv> {
    /// Build the cipher from configuration using the OS RNG.
    ///
    /// # Errors
    ///
    /// Invalid secret material is an error only for
    /// [`Deployment::Production`]. In development the cipher is returned in a
    /// disabled state and a warning is logged; message paths then fall back
    /// to plaintext.
    pub fn from_config(config: &CipherConfig) -> Result<Self, ConfigError> {
        Self::with_env(config, SystemEnv::new())
    }

    /// Build a ready cipher from already-validated material.
    pub fn new(material: SecretMaterial) -> Self {
        Self { material: Ok(material), env: SystemEnv::new() }
    }
}

impl<E: Environment> MessageCipher<E> {
    /// Build the cipher from configuration with a custom environment.
    ///
    /// Same startup policy as [`MessageCipher::from_config`].
    pub fn with_env(config: &CipherConfig, env: E) -> Result<Self, ConfigError> {
        let material = config.validate();

        match (&material, config.deployment) {
            (Ok(_), _) => {
                tracing::info!(deployment = %config.deployment, "message encryption enabled");
            },
            (Err(err), Deployment::Production) => {
                tracing::error!(error = %err, "refusing to start without message encryption");
                return Err(err.clone());
            },
            (Err(err), Deployment::Development) => {
                tracing::warn!(
                    error = %err,
                    "message encryption disabled; messages will be stored as plaintext"
                );
            },
        }

        Ok(Self { material, env })
    }

    /// Build a cipher from validated material with a custom environment.
    pub fn from_material(material: SecretMaterial, env: E) -> Self {
        Self { material: Ok(material), env }
    }

    /// Build a disabled cipher that fails every operation with `error`.
    pub fn disabled(error: ConfigError, env: E) -> Self {
        Self { material: Err(error), env }
    }

    /// Report whether secret material is present and valid.
    ///
    /// # Errors
    ///
    /// The validation error recorded at construction.
    pub fn validate_config(&self) -> Result<(), ConfigError> {
        self.material.as_ref().map(|_| ()).map_err(Clone::clone)
    }

    /// Returns true if encryption is available.
    pub fn is_enabled(&self) -> bool {
        self.material.is_ok()
    }

    /// Encrypt `plaintext` for the conversation between `a` and `b`.
    ///
    /// Each call draws a fresh nonce, so encrypting the same text twice gives
    /// two different payloads.
    ///
    /// # Errors
    ///
    /// - `Configuration`: secret material is missing or invalid
    /// - `EncryptionFailed`: the RNG or AEAD failed
    pub fn encrypt(&self, plaintext: &str, a: &str, b: &str) -> Result<String, CipherError> {
        let material = self.material()?;
        let nonce = self
            .env
            .nonce()
            .map_err(|e| CipherError::EncryptionFailed { reason: e.to_string() })?;

        let payload = encrypt_for_pair(material, plaintext, a, b, nonce)?;
        tracing::debug!(a, b, "encrypted message");
        Ok(payload)
    }

    /// Decrypt a serialized payload for the conversation between `a` and `b`.
    ///
    /// Participant order does not matter.
    ///
    /// # Errors
    ///
    /// - `Configuration`: secret material is missing or invalid
    /// - `MalformedPayload`: payload cannot be parsed
    /// - `AuthenticationFailed`: tampered payload or wrong participant pair
    pub fn decrypt(&self, payload: &str, a: &str, b: &str) -> Result<String, CipherError> {
        let material = self.material()?;
        let plaintext = decrypt_for_pair(material, payload, a, b)?;
        tracing::debug!(a, b, "decrypted message");
        Ok(plaintext)
    }

    fn material(&self) -> Result<&SecretMaterial, CipherError> {
        self.material.as_ref().map_err(|err| CipherError::Configuration(err.clone()))
    }
}
