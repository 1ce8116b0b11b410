//! Cipher configuration.
//!
//! Secrets are read once at process start into a [`CipherConfig`], validated
//! once by [`crate::MessageCipher::from_config`], and never read again.

use std::{fmt, str::FromStr};

use confide_crypto::{ConfigError, SecretMaterial};

/// Environment variable holding the shared message secret.
pub const SECRET_ENV: &str = "CONFIDE_MESSAGE_SECRET";

/// Environment variable holding the key-derivation salt.
pub const SALT_ENV: &str = "CONFIDE_MESSAGE_SALT";

/// Environment variable selecting the deployment policy.
pub const DEPLOYMENT_ENV: &str = "CONFIDE_DEPLOYMENT";

/// How strictly invalid secret material is treated at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deployment {
    /// Invalid secret material refuses to start.
    #[default]
    Production,
    /// Invalid secret material logs a warning; messages fall back to
    /// plaintext.
    Development,
}

impl Deployment {
    /// Parse a deployment name, falling back to [`Deployment::Production`]
    /// for unset or unrecognised values.
    pub fn from_name(name: Option<&str>) -> Self {
        name.and_then(|name| name.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for Deployment {
    type Err = UnknownDeployment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            _ => Err(UnknownDeployment(s.to_string())),
        }
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Development => f.write_str("development"),
        }
    }
}

/// Unrecognised deployment name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown deployment: {0:?} (expected production or development)")]
pub struct UnknownDeployment(pub String);

/// Raw cipher configuration, before validation.
#[derive(Clone, Default)]
pub struct CipherConfig {
    /// Shared secret (HKDF input keying material)
    pub secret: Option<String>,
    /// Key-derivation salt
    pub salt: Option<String>,
    /// Startup policy for invalid secrets
    pub deployment: Deployment,
}

impl CipherConfig {
    /// Build a config from any key lookup.
    ///
    /// Keys are [`SECRET_ENV`], [`SALT_ENV`] and [`DEPLOYMENT_ENV`].
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        Self {
            secret: lookup(SECRET_ENV),
            salt: lookup(SALT_ENV),
            deployment: Deployment::from_name(lookup(DEPLOYMENT_ENV).as_deref()),
        }
    }

    /// Build a config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Validate the secret and salt.
    ///
    /// # Errors
    ///
    /// - `MissingSecret` / `MissingSalt`: value unset or blank
    /// - `PlaceholderSecret` / `PlaceholderSalt`: value is a template default
    pub fn validate(&self) -> Result<SecretMaterial, ConfigError> {
        SecretMaterial::new(
            self.secret.as_deref().unwrap_or_default(),
            self.salt.as_deref().unwrap_or_default(),
        )
    }
}

impl fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("salt", &self.salt.as_ref().map(|_| "<redacted>"))
            .field("deployment", &self.deployment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn reads_all_keys() {
        let config = CipherConfig::from_lookup(lookup(&[
            (SECRET_ENV, "s3cret"),
            (SALT_ENV, "NaCl"),
            (DEPLOYMENT_ENV, "development"),
        ]));

        assert_eq!(config.secret.as_deref(), Some("s3cret"));
        assert_eq!(config.salt.as_deref(), Some("NaCl"));
        assert_eq!(config.deployment, Deployment::Development);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn deployment_defaults_to_production() {
        let config = CipherConfig::from_lookup(lookup(&[]));
        assert_eq!(config.deployment, Deployment::Production);
    }

    #[test]
    fn unknown_deployment_is_production() {
        assert_eq!(Deployment::from_name(Some("staging")), Deployment::Production);
        assert_eq!(Deployment::from_name(Some(" DEV ")), Deployment::Development);
    }

    #[test]
    fn deployment_parse_rejects_unknown() {
        assert!("staging".parse::<Deployment>().is_err());
        assert_eq!("Production".parse::<Deployment>().unwrap(), Deployment::Production);
    }

    #[test]
    fn missing_values_fail_validation() {
        let config = CipherConfig::from_lookup(lookup(&[(SALT_ENV, "NaCl")]));
        assert_eq!(config.validate().unwrap_err(), ConfigError::MissingSecret);

        let config = CipherConfig::from_lookup(lookup(&[(SECRET_ENV, "s3cret")]));
        assert_eq!(config.validate().unwrap_err(), ConfigError::MissingSalt);
    }

    #[test]
    fn placeholder_values_fail_validation() {
        let config =
            CipherConfig::from_lookup(lookup(&[(SECRET_ENV, "changeme"), (SALT_ENV, "NaCl")]));
        assert_eq!(config.validate().unwrap_err(), ConfigError::PlaceholderSecret);
    }

    #[test]
    fn from_env_reads_process_environment() {
        let expected = CipherConfig::from_lookup(|key: &str| std::env::var(key).ok());
        let config = CipherConfig::from_env();

        assert_eq!(config.secret, expected.secret);
        assert_eq!(config.salt, expected.salt);
        assert_eq!(config.deployment, expected.deployment);
    }

    #[test]
    fn debug_redacts_secrets() {
        let config =
            CipherConfig::from_lookup(lookup(&[(SECRET_ENV, "s3cret"), (SALT_ENV, "NaCl")]));
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cret"));
        assert!(!debug.contains("NaCl"));
        assert!(debug.contains("Production"));
    }
}
