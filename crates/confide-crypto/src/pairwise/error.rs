//! Error types for pairwise message encryption

use thiserror::Error;

/// Problems with the process-wide secret material.
///
/// Callers on the message path treat these as "encryption unavailable" rather
/// than as a process failure. Only startup in a production deployment turns
/// them fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Secret is unset or blank
    #[error("message secret is not configured")]
    MissingSecret,

    /// Salt is unset or blank
    #[error("message salt is not configured")]
    MissingSalt,

    /// Secret is still a template value
    #[error("message secret is a placeholder value")]
    PlaceholderSecret,

    /// Salt is still a template value
    #[error("message salt is a placeholder value")]
    PlaceholderSalt,
}

/// Errors from pairwise encrypt/decrypt operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// Secret material is missing or invalid
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The cipher or its randomness source failed while encrypting
    #[error("encryption failed: {reason}")]
    EncryptionFailed {
        /// Reason for encryption failure
        reason: String,
    },

    /// Serialized payload could not be parsed
    #[error("malformed payload: {reason}")]
    MalformedPayload {
        /// What was wrong with the payload
        reason: String,
    },

    /// Authentication tag mismatch (tampered payload or wrong participant pair)
    #[error("decryption failed: authentication tag mismatch")]
    AuthenticationFailed,
}

impl CipherError {
    /// Returns true if this error came from reading a stored payload.
    ///
    /// Covers both parse failures and tag mismatches. Read paths substitute a
    /// placeholder for the affected message only.
    pub fn is_decryption_failure(&self) -> bool {
        match self {
            Self::MalformedPayload { .. } | Self::AuthenticationFailed => true,
            Self::Configuration(_) | Self::EncryptionFailed { .. } => false,
        }
    }

    /// Returns true if this error is caused by missing or placeholder secrets.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPayload { reason: reason.into() }
    }
}
