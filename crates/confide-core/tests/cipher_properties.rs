//! Property-based tests for the message cipher and message layer
//!
//! 1. **Order independence**: either participant order decrypts
//! 2. **Non-determinism**: repeated encryption never repeats a payload
//! 3. **Total read path**: `reveal` never fails, whatever is stored
//! 4. **Flag fidelity**: `is_encrypted` matches what was actually stored

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use confide_core::{
    CipherError, ConfigError, DisplayText, EntropyError, Environment, MAX_MESSAGE_CHARS,
    MessageBody, MessageCipher, SecretMaterial, StoredMessage, SystemEnv, compose, reveal,
    seal_outgoing,
};
use proptest::prelude::*;

// Test environment producing a distinct, predictable nonce per call
#[derive(Clone, Default)]
struct CountingEnv {
    counter: Arc<AtomicU64>,
}

impl Environment for CountingEnv {
    fn random_bytes(&self, buffer: &mut [u8]) -> Result<(), EntropyError> {
        let value = self.counter.fetch_add(1, Ordering::Relaxed).to_be_bytes();
        buffer.fill(0);
        let len = buffer.len();
        let start = len.saturating_sub(value.len());
        buffer[start..].copy_from_slice(&value[value.len() - (len - start)..]);
        Ok(())
    }
}

fn material() -> SecretMaterial {
    SecretMaterial::new("s3cret", "NaCl").unwrap()
}

fn counting_cipher() -> MessageCipher<CountingEnv> {
    MessageCipher::from_material(material(), CountingEnv::default())
}

fn identifier() -> impl Strategy<Value = String> {
    "[a-f0-9]{24}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_order_independent_roundtrip(
        plaintext in ".{1,300}",
        a in identifier(),
        b in identifier(),
    ) {
        let cipher = counting_cipher();
        let payload = cipher.encrypt(&plaintext, &a, &b).unwrap();

        prop_assert_eq!(cipher.decrypt(&payload, &a, &b).unwrap(), plaintext.clone());
        prop_assert_eq!(cipher.decrypt(&payload, &b, &a).unwrap(), plaintext);
    }

    #[test]
    fn prop_repeated_encryption_differs(plaintext in ".{1,100}", repeats in 2usize..8) {
        let cipher = counting_cipher();
        let payloads: Vec<String> =
            (0..repeats).map(|_| cipher.encrypt(&plaintext, "user1", "user2").unwrap()).collect();

        for (i, first) in payloads.iter().enumerate() {
            for second in &payloads[i + 1..] {
                prop_assert_ne!(first, second);
            }
            prop_assert_eq!(cipher.decrypt(first, "user2", "user1").unwrap(), plaintext.clone());
        }
    }

    #[test]
    fn prop_reveal_is_total(
        text in proptest::option::of(".{0,200}"),
        is_encrypted in any::<bool>(),
    ) {
        let cipher = counting_cipher();
        let record = StoredMessage { text: text.clone(), is_encrypted };

        let shown = reveal(&cipher, &record, "user1", "user2");
        match (text, is_encrypted) {
            (None, _) => prop_assert_eq!(shown, DisplayText::Empty),
            (Some(text), false) => prop_assert_eq!(shown, DisplayText::Text(text)),
            // Arbitrary text is never a valid payload under this key
            (Some(_), true) => prop_assert_eq!(shown, DisplayText::DecryptionFailed),
        }
    }

    #[test]
    fn prop_flag_matches_stored_variant(text in "[^\\s].{0,100}", enabled in any::<bool>()) {
        let cipher = if enabled {
            counting_cipher()
        } else {
            MessageCipher::disabled(ConfigError::MissingSalt, CountingEnv::default())
        };

        let body = seal_outgoing(&cipher, &compose(text.clone()).unwrap(), "user1", "user2");
        let record = StoredMessage::from(body.clone());

        prop_assert_eq!(record.is_encrypted, enabled);
        prop_assert_eq!(record.is_encrypted, body.is_encrypted());
        if !enabled {
            prop_assert_eq!(&body, &MessageBody::Plaintext(text.clone()));
        }
        prop_assert_eq!(reveal(&cipher, &record, "user2", "user1"), DisplayText::Text(text));
    }
}

#[test]
fn hello_scenario_with_system_rng() {
    let cipher = MessageCipher::new(material());

    let c1 = cipher.encrypt("hello", "user1", "user2").unwrap();
    let c2 = cipher.encrypt("hello", "user2", "user1").unwrap();
    assert_ne!(c1, c2);

    for payload in [&c1, &c2] {
        assert_eq!(cipher.decrypt(payload, "user1", "user2").unwrap(), "hello");
        assert_eq!(cipher.decrypt(payload, "user2", "user1").unwrap(), "hello");
    }
}

#[test]
fn edge_inputs_roundtrip_through_message_layer() {
    let cipher = MessageCipher::from_material(material(), SystemEnv::new());
    let ceiling = "🙂".repeat(MAX_MESSAGE_CHARS);
    let cases = ["🔐", "a:b", ":", "key: value: more", ceiling.as_str()];

    for text in cases {
        let body = seal_outgoing(&cipher, &compose(text).unwrap(), "user1", "user2");
        assert!(body.is_encrypted());
        let record = StoredMessage::from(body);
        assert_eq!(reveal(&cipher, &record, "user2", "user1"), DisplayText::Text(text.to_string()));
    }
}

#[test]
fn flipping_any_payload_character_is_detected() {
    let cipher = counting_cipher();
    let payload = cipher.encrypt("hello", "user1", "user2").unwrap();

    for (index, original) in payload.char_indices() {
        let replacement = if original == '0' { '1' } else { '0' };
        let mut tampered = payload.clone();
        tampered.replace_range(index..=index, &replacement.to_string());

        let result = cipher.decrypt(&tampered, "user1", "user2");
        assert!(
            result.as_ref().is_err_and(CipherError::is_decryption_failure),
            "edit at {index} not detected: {result:?}"
        );
    }
}

#[test]
fn missing_configuration_is_configuration_error() {
    let cipher = MessageCipher::disabled(ConfigError::MissingSecret, SystemEnv::new());
    let payload = counting_cipher().encrypt("hello", "user1", "user2").unwrap();

    let encrypt = cipher.encrypt("hello", "user1", "user2").unwrap_err();
    let decrypt = cipher.decrypt(&payload, "user1", "user2").unwrap_err();

    assert!(encrypt.is_configuration());
    assert!(decrypt.is_configuration());
}
