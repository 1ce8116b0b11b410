//! Message bodies on the send and read paths.
//!
//! Stored message text is either ciphertext or, when encryption was
//! unavailable, plaintext. [`MessageBody`] makes that distinction a type;
//! [`StoredMessage`] is the persisted shape with its `is_encrypted` flag.
//!
//! Neither [`seal_outgoing`] nor [`reveal`] can fail: a send always stores
//! something and a read always displays something. Messaging stays available
//! when encryption is misconfigured, at the cost of storing plaintext. The
//! `is_encrypted` flag records which policy applied and is set only from the
//! variant actually produced.

use std::fmt;

use thiserror::Error;

use crate::{cipher::MessageCipher, env::Environment};

/// Maximum message length, in characters.
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// Shown in place of a message that could not be decrypted.
pub const DECRYPTION_FAILED_PLACEHOLDER: &str = "[message decryption failed]";

/// Errors composing an outgoing message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// Text is empty or whitespace only
    #[error("message text is empty")]
    Empty,

    /// Text exceeds [`MAX_MESSAGE_CHARS`]
    #[error("message is {len} characters, maximum is {max}")]
    TooLong {
        /// Length of the rejected text in characters
        len: usize,
        /// Allowed maximum
        max: usize,
    },
}

/// Validated outgoing message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingText(String);

impl OutgoingText {
    /// The validated text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validate outgoing text against the message size rules.
///
/// Length is counted in Unicode scalar values.
pub fn compose(text: impl Into<String>) -> Result<OutgoingText, MessageError> {
    let text = text.into();
    if text.trim().is_empty() {
        return Err(MessageError::Empty);
    }

    let len = text.chars().count();
    if len > MAX_MESSAGE_CHARS {
        return Err(MessageError::TooLong { len, max: MAX_MESSAGE_CHARS });
    }

    Ok(OutgoingText(text))
}

/// Message text as stored, tagged by how it was stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// Stored as-is (encryption was unavailable at send time)
    Plaintext(String),
    /// Serialized pairwise-encrypted payload
    Ciphertext(String),
}

impl MessageBody {
    /// Returns true for [`MessageBody::Ciphertext`].
    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Ciphertext(_))
    }
}

/// Persisted message text with its encryption flag.
///
/// `text` is `None` for messages without text (e.g. image-only).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredMessage {
    /// Ciphertext, plaintext fallback, or nothing
    pub text: Option<String>,
    /// Whether `text` holds ciphertext
    pub is_encrypted: bool,
}

impl StoredMessage {
    /// Record for a message body. The flag is derived from the variant.
    pub fn from_body(body: Option<MessageBody>) -> Self {
        match body {
            Some(MessageBody::Plaintext(text)) => Self { text: Some(text), is_encrypted: false },
            Some(MessageBody::Ciphertext(text)) => Self { text: Some(text), is_encrypted: true },
            None => Self::default(),
        }
    }

    /// Tagged body for this record, or `None` if it carries no text.
    pub fn body(&self) -> Option<MessageBody> {
        let text = self.text.clone()?;
        Some(if self.is_encrypted {
            MessageBody::Ciphertext(text)
        } else {
            MessageBody::Plaintext(text)
        })
    }
}

impl From<MessageBody> for StoredMessage {
    fn from(body: MessageBody) -> Self {
        Self::from_body(Some(body))
    }
}

/// What the read path shows for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayText {
    /// Readable text
    Text(String),
    /// Message has no text
    Empty,
    /// Stored ciphertext could not be decrypted
    DecryptionFailed,
}

impl DisplayText {
    /// Text to render, with the placeholder for failed decryptions.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Empty => "",
            Self::DecryptionFailed => DECRYPTION_FAILED_PLACEHOLDER,
        }
    }
}

impl fmt::Display for DisplayText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encrypt outgoing text, falling back to plaintext if encryption fails.
///
/// Never drops the message: any configuration, RNG or cipher failure is
/// logged and the text is returned as [`MessageBody::Plaintext`].
pub fn seal_outgoing<E: Environment>(
    cipher: &MessageCipher<E>,
    text: &OutgoingText,
    sender: &str,
    receiver: &str,
) -> MessageBody {
    match cipher.encrypt(text.as_str(), sender, receiver) {
        Ok(payload) => MessageBody::Ciphertext(payload),
        Err(err) => {
            tracing::warn!(
                error = %err,
                sender,
                receiver,
                "storing message without encryption"
            );
            MessageBody::Plaintext(text.as_str().to_string())
        },
    }
}

/// Produce display text for one stored record.
///
/// Plaintext records are shown as-is. Ciphertext that cannot be decrypted,
/// for any reason, becomes [`DisplayText::DecryptionFailed`].
pub fn reveal<E: Environment>(
    cipher: &MessageCipher<E>,
    record: &StoredMessage,
    a: &str,
    b: &str,
) -> DisplayText {
    match record.body() {
        None => DisplayText::Empty,
        Some(MessageBody::Plaintext(text)) => DisplayText::Text(text),
        Some(MessageBody::Ciphertext(payload)) => match cipher.decrypt(&payload, a, b) {
            Ok(text) => DisplayText::Text(text),
            Err(err) => {
                tracing::warn!(error = %err, a, b, "message could not be decrypted");
                DisplayText::DecryptionFailed
            },
        },
    }
}

/// Produce display text for every record of a conversation.
///
/// Each record is revealed independently; a failure affects only its own
/// entry.
pub fn reveal_conversation<'r, E, I>(
    cipher: &MessageCipher<E>,
    records: I,
    a: &str,
    b: &str,
) -> Vec<DisplayText>
where
    E: Environment,
    I: IntoIterator<Item = &'r StoredMessage>,
{
    records.into_iter().map(|record| reveal(cipher, record, a, b)).collect()
}
