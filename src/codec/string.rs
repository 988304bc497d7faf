//! Framed string encryption.
//!
//! ```text
//! [ length prefix ][ uppercase hex ciphertext ][ CRC-32: 8 hex ]
//! ```
//!
//! The prefix declares the number of hex characters; the checksum covers the prefix and
//! the hex body and is verified before anything else is parsed.

use anyhow::{Result, ensure};
use tracing::{debug, warn};

use crate::cipher::{BlockCipher, Checksum, PlanarParams, SineMapStream};
use crate::config::CHECKSUM_LEN;
use crate::error::CipherError;
use crate::framing::{decode_prefix, encode_prefix};
use crate::partition::spans;
use crate::secret::Secret;
use crate::types::Processing;

/// Encrypts byte strings into self-checking hex frames.
pub struct StringCodec {
    params: PlanarParams,
}

impl StringCodec {
    pub fn new(secret: &Secret) -> Self {
        Self { params: PlanarParams::from_key(secret.expose_secret()) }
    }

    /// Encrypts `plaintext` into a hex frame.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        ensure!(!plaintext.is_empty(), CipherError::EmptyInput);

        let mut buffer = plaintext.to_vec();
        self.diffuse(Processing::Encryption, &mut buffer);

        let body = hex::encode_upper(&buffer);
        let mut frame = encode_prefix(body.len() as u64);
        frame.push_str(&body);

        let checksum = Checksum::new(frame.as_bytes());
        frame.push_str(checksum.as_str());

        debug!(bytes = plaintext.len(), frame = frame.len(), "sealed string");
        Ok(frame)
    }

    /// Verifies and decrypts a frame produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, frame: &str) -> Result<Vec<u8>> {
        ensure!(!frame.is_empty(), CipherError::EmptyInput);

        let frame = frame.as_bytes();
        let Some(split) = frame.len().checked_sub(CHECKSUM_LEN) else {
            warn!(len = frame.len(), "frame shorter than its checksum");
            return Err(CipherError::ChecksumMismatch.into());
        };

        let (content, expected) = frame.split_at(split);
        if let Err(e) = Checksum::new(content).verify(expected) {
            warn!("string frame failed checksum verification");
            return Err(e.into());
        }

        let (declared, used) = decode_prefix(content)?;
        let body = &content[used..];
        ensure!(u64::try_from(body.len()).is_ok_and(|len| len == declared), CipherError::MalformedFrame("hex length does not match prefix"));
        ensure!(!body.is_empty() && body.len() % 2 == 0, CipherError::MalformedFrame("hex body must be a non-empty even number of characters"));

        let mut buffer = hex::decode(body).map_err(|_| CipherError::MalformedFrame("body is not hex"))?;
        self.diffuse(Processing::Decryption, &mut buffer);

        debug!(bytes = buffer.len(), "opened string");
        Ok(buffer)
    }

    /// Like [`decrypt`](Self::decrypt), but requires the plaintext to be UTF-8.
    pub fn decrypt_text(&self, frame: &str) -> Result<String> {
        let bytes = self.decrypt(frame)?;
        String::from_utf8(bytes).map_err(|_| CipherError::InvalidText.into())
    }

    fn diffuse(&self, mode: Processing, buffer: &mut [u8]) {
        let mut cipher = BlockCipher::new(SineMapStream::new(self.params));

        for span in spans(buffer.len() as u64) {
            // Offsets never exceed the in-memory buffer length.
            let start = usize::try_from(span.offset).unwrap_or(usize::MAX);
            cipher.apply_padded(mode, &mut buffer[start..start + span.len], span.block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec(key: &str) -> StringCodec {
        StringCodec::new(&Secret::new(key).unwrap())
    }

    fn category(err: &anyhow::Error) -> Option<&CipherError> {
        err.downcast_ref::<CipherError>()
    }

    #[test]
    fn test_hello_frame_shape() {
        let codec = codec("12345678");
        let frame = codec.encrypt(b"Hello").unwrap();

        assert_eq!(frame.len(), 22);
        assert!(frame.starts_with("080A"));
        assert!(frame.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)));
        assert_eq!(codec.decrypt_text(&frame).unwrap(), "Hello");
    }

    #[test]
    fn test_known_ciphertext() {
        let codec = codec("12345678");
        assert_eq!(codec.encrypt(b"Hello").unwrap(), "080A2BEB32A696910C02FB");

        let counting: Vec<u8> = (0..40).collect();
        let frame = codec.encrypt(&counting).unwrap();
        assert_eq!(
            frame,
            "085063197D482E9BFFFD841CFB2B9D080082D19B04EC6A82D22BB8C230596A9BB3722B0D862B8BC255005F91ED1F"
        );
        assert_eq!(codec.decrypt(&frame).unwrap(), counting);
    }

    #[test]
    fn test_deterministic() {
        let codec = codec("deterministic-key");
        assert_eq!(codec.encrypt(b"same input").unwrap(), codec.encrypt(b"same input").unwrap());
    }

    #[test]
    fn test_every_single_char_flip_is_rejected() {
        let codec = codec("12345678");
        let frame = codec.encrypt(b"tamper me, please").unwrap();

        for i in 0..frame.len() {
            let mut bytes = frame.clone().into_bytes();
            bytes[i] = if bytes[i] == b'0' { b'1' } else { b'0' };
            let tampered = String::from_utf8(bytes).unwrap();

            let err = codec.decrypt(&tampered).unwrap_err();
            assert_eq!(category(&err), Some(&CipherError::ChecksumMismatch), "flip at {i}");
        }
    }

    fn ciphertext(frame: &str) -> Vec<u8> {
        let (_, used) = decode_prefix(frame.as_bytes()).unwrap();
        hex::decode(&frame[used..frame.len() - CHECKSUM_LEN]).unwrap()
    }

    #[test]
    fn test_key_sensitivity() {
        let plaintext: Vec<u8> = (0..5003u32).map(|i| (i % 97) as u8).collect();
        let first = ciphertext(&codec("first-key-123").encrypt(&plaintext).unwrap());
        let second = ciphertext(&codec("first-key-124").encrypt(&plaintext).unwrap());

        let spans: Vec<_> = spans(plaintext.len() as u64).collect();
        assert!(spans.len() > 2);
        for span in spans {
            let start = usize::try_from(span.offset).unwrap();
            let range = start..start + span.len;
            assert_ne!(first[range.clone()], second[range], "block at {start} did not change");
        }
    }

    #[test]
    fn test_wrong_key_yields_garbage() {
        let frame = codec("first-key-123").encrypt(b"secret message").unwrap();

        // The checksum does not cover the key, so a wrong key yields garbage, not an error.
        let opened = codec("first-key-124").decrypt(&frame).unwrap();
        assert_ne!(opened, b"secret message");
    }

    #[test]
    fn test_multi_block_roundtrip() {
        let codec = codec("multi-block-key");
        let plaintext: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();

        let frame = codec.encrypt(&plaintext).unwrap();
        assert!(frame.starts_with(&encode_prefix(10_000)));
        assert_eq!(codec.decrypt(&frame).unwrap(), plaintext);
    }

    #[test]
    fn test_partial_block_lengths_roundtrip() {
        let codec = codec("partial-lengths");
        for len in [1usize, 15, 16, 17, 18, 33, 100] {
            let plaintext: Vec<u8> = (0..len).map(|i| (i * 7) as u8).collect();
            let frame = codec.encrypt(&plaintext).unwrap();
            assert_eq!(codec.decrypt(&frame).unwrap(), plaintext, "len {len}");
        }
    }

    #[test]
    fn test_empty_input_rejected() {
        let codec = codec("12345678");
        assert_eq!(category(&codec.encrypt(b"").unwrap_err()), Some(&CipherError::EmptyInput));
        assert_eq!(category(&codec.decrypt("").unwrap_err()), Some(&CipherError::EmptyInput));
    }

    #[test]
    fn test_short_frame_is_checksum_mismatch() {
        let err = codec("12345678").decrypt("ABC").unwrap_err();
        assert_eq!(category(&err), Some(&CipherError::ChecksumMismatch));
    }

    #[test]
    fn test_trailing_characters_rejected() {
        let codec = codec("12345678");
        let frame = codec.encrypt(b"Hello").unwrap();

        // Re-checksum a body with two extra hex characters so only the length check can fail.
        let content = format!("{}00", &frame[..frame.len() - CHECKSUM_LEN]);
        let forged = format!("{content}{}", Checksum::new(content.as_bytes()).as_str());

        let err = codec.decrypt(&forged).unwrap_err();
        assert!(matches!(category(&err), Some(CipherError::MalformedFrame(_))));
    }

    #[test]
    fn test_invalid_utf8_plaintext() {
        let codec = codec("12345678");
        let frame = codec.encrypt(&[0xFF, 0xFE, 0x00]).unwrap();

        assert_eq!(codec.decrypt(&frame).unwrap(), vec![0xFF, 0xFE, 0x00]);
        assert_eq!(category(&codec.decrypt_text(&frame).unwrap_err()), Some(&CipherError::InvalidText));
    }
}
