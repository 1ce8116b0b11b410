//! Confide message encryption component.
//!
//! Wraps [`confide_crypto`]'s pure primitives with what the message-send and
//! message-read paths need: validated configuration, a randomness source, and
//! a message layer that degrades gracefully instead of failing requests.
//!
//! # Components
//!
//! - [`CipherConfig`]: secret, salt and deployment policy, read once at start
//! - [`MessageCipher`]: `encrypt` / `decrypt` / `validate_config`
//! - [`seal_outgoing`]: send path, ciphertext or plaintext fallback
//! - [`reveal`] / [`reveal_conversation`]: read path, per-message display
//!   text
//! - [`SystemEnv`]: production environment (OS RNG)

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cipher;
pub mod config;
pub mod env;
pub mod message;

pub use cipher::MessageCipher;
pub use config::{CipherConfig, DEPLOYMENT_ENV, Deployment, SALT_ENV, SECRET_ENV};
pub use confide_crypto::{CipherError, ConfigError, SecretMaterial};
pub use env::{EntropyError, Environment, SystemEnv};
pub use message::{
    DECRYPTION_FAILED_PLACEHOLDER, DisplayText, MAX_MESSAGE_CHARS, MessageBody, MessageError,
    OutgoingText, StoredMessage, compose, reveal, reveal_conversation, seal_outgoing,
};
