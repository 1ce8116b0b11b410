//! Confide operator tool.
//!
//! # Usage
//!
//! ```bash
//! # Check that the deployment's secret material is usable
//! CONFIDE_MESSAGE_SECRET=... CONFIDE_MESSAGE_SALT=... confide check
//!
//! # Encrypt and decrypt a message for a conversation by hand
//! confide encrypt --from user1 --to user2 "hello"
//! confide decrypt --from user2 --to user1 "<nonce>:<ciphertext>"
//! ```

use std::{
    convert::Infallible,
    io::{self, Write},
};

use clap::{Parser, Subcommand};
use confide_core::{CipherConfig, Deployment, MessageCipher};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Confide message encryption tool
///
/// Flags override the `CONFIDE_MESSAGE_SECRET`, `CONFIDE_MESSAGE_SALT` and
/// `CONFIDE_DEPLOYMENT` environment variables.
#[derive(Parser, Debug)]
#[command(name = "confide")]
#[command(about = "Pairwise message encryption for Confide conversations")]
#[command(version)]
struct Args {
    /// Shared message secret
    #[arg(long)]
    secret: Option<String>,

    /// Key-derivation salt
    #[arg(long)]
    salt: Option<String>,

    /// Deployment policy (production or development; anything else is
    /// production)
    #[arg(
        long,
        value_parser = |name: &str| Ok::<_, Infallible>(Deployment::from_name(Some(name)))
    )]
    deployment: Option<Deployment>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the configured secret and salt
    Check,

    /// Encrypt a message for a conversation
    Encrypt {
        /// Sender identifier
        #[arg(long)]
        from: String,
        /// Receiver identifier
        #[arg(long)]
        to: String,
        /// Message text
        text: String,
    },

    /// Decrypt a stored payload for a conversation
    Decrypt {
        /// One participant identifier
        #[arg(long)]
        from: String,
        /// The other participant identifier
        #[arg(long)]
        to: String,
        /// Serialized payload
        payload: String,
    },
}

impl Args {
    /// Layer command-line flags over `base`.
    fn cipher_config(&self, base: CipherConfig) -> CipherConfig {
        CipherConfig {
            secret: self.secret.clone().or(base.secret),
            salt: self.salt.clone().or(base.salt),
            deployment: self.deployment.unwrap_or(base.deployment),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let config = args.cipher_config(CipherConfig::from_env());
    let mut stdout = io::stdout().lock();

    match &args.command {
        Command::Check => {
            if let Err(err) = config.validate() {
                tracing::error!(error = %err, deployment = %config.deployment, "check failed");
                return Err(err.into());
            }
            tracing::info!(deployment = %config.deployment, "secret material is valid");
            writeln!(stdout, "ok: message encryption configured ({})", config.deployment)?;
        },
        Command::Encrypt { from, to, text } => {
            let cipher = MessageCipher::from_config(&config)?;
            writeln!(stdout, "{}", cipher.encrypt(text, from, to)?)?;
        },
        Command::Decrypt { from, to, payload } => {
            let cipher = MessageCipher::from_config(&config)?;
            writeln!(stdout, "{}", cipher.decrypt(payload, from, to)?)?;
        },
    }

    Ok(())
}
