//! Process-wide secret material for pairwise key derivation

use std::fmt;

use zeroize::Zeroize;

use super::error::ConfigError;

/// Template values shipped in sample configuration files.
///
/// Compared case-insensitively after trimming.
pub const PLACEHOLDER_VALUES: &[&str] = &[
    "changeme",
    "change-me",
    "change_me",
    "default",
    "placeholder",
    "secret",
    "salt",
    "your-secret",
    "your_secret",
    "your-secret-key",
    "your_secret_key",
    "your-salt",
    "your_salt",
    "your-encryption-secret",
    "your_encryption_secret",
    "your-encryption-salt",
    "your_encryption_salt",
    "xxx",
];

/// Validated secret and salt.
///
/// Construction is the only validation point: a `SecretMaterial` value always
/// holds a non-blank, non-placeholder secret and salt. Both are zeroized on
/// drop and redacted from `Debug`.
#[derive(Clone)]
pub struct SecretMaterial {
    secret: String,
    salt: String,
}

impl SecretMaterial {
    /// Validate and wrap a secret and salt.
    ///
    /// Secret problems are reported before salt problems.
    pub fn new(secret: impl Into<String>, salt: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        let salt = salt.into();

        check_value(&secret, ConfigError::MissingSecret, ConfigError::PlaceholderSecret)?;
        check_value(&salt, ConfigError::MissingSalt, ConfigError::PlaceholderSalt)?;

        Ok(Self { secret, salt })
    }

    /// Secret bytes, used as HKDF input keying material.
    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    /// Salt bytes, used as the HKDF salt.
    pub fn salt(&self) -> &[u8] {
        self.salt.as_bytes()
    }
}

impl fmt::Debug for SecretMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretMaterial")
            .field("secret", &"<redacted>")
            .field("salt", &"<redacted>")
            .finish()
    }
}

impl Drop for SecretMaterial {
    fn drop(&mut self) {
        self.secret.zeroize();
        self.salt.zeroize();
    }
}

/// Returns true if `value` is a known template value.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    PLACEHOLDER_VALUES.iter().any(|placeholder| placeholder.eq_ignore_ascii_case(value))
}

fn check_value(
    value: &str,
    missing: ConfigError,
    placeholder: ConfigError,
) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(missing);
    }
    if is_placeholder(value) {
        return Err(placeholder);
    }
    Ok(())
}
