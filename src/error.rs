//! Error categories surfaced by the cipher.
//!
//! Codecs report failures through `anyhow`; the variants below are attached as the
//! root cause so callers can tell a validation problem from a tampered ciphertext.

use std::fmt;

use crate::config::{KEY_MAX_LENGTH, KEY_MIN_LENGTH};

/// Errors produced by the cipher's own checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// Key length is outside `[KEY_MIN_LENGTH, KEY_MAX_LENGTH]`.
    KeyLength(usize),
    /// Plaintext or ciphertext input is empty.
    EmptyInput,
    /// An input or output path is empty.
    EmptyPath,
    /// Input and output resolve to the same file.
    SamePath,
    /// A parallel operation was asked to run on zero threads.
    NoThreads,
    /// The trailing checksum of a string frame does not match its content.
    ChecksumMismatch,
    /// A frame or length prefix could not be parsed.
    MalformedFrame(&'static str),
    /// Decrypted bytes are not valid UTF-8.
    InvalidText,
}

impl fmt::Display for CipherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherError::KeyLength(len) => {
                write!(f, "Key must be between {KEY_MIN_LENGTH} and {KEY_MAX_LENGTH} characters, got {len}")
            }
            CipherError::EmptyInput => write!(f, "Input cannot be empty"),
            CipherError::EmptyPath => write!(f, "File paths cannot be empty"),
            CipherError::SamePath => write!(f, "Input and output must be different files"),
            CipherError::NoThreads => write!(f, "Thread count must be at least 1"),
            CipherError::ChecksumMismatch => write!(f, "Ciphertext checksum verification failed"),
            CipherError::MalformedFrame(what) => write!(f, "Malformed ciphertext frame: {what}"),
            CipherError::InvalidText => write!(f, "Decrypted data is not valid UTF-8"),
        }
    }
}

impl std::error::Error for CipherError {}

/// Rejects keys outside the accepted length range.
pub fn check_key_length(key: &str) -> Result<(), CipherError> {
    let len = key.len();
    if (KEY_MIN_LENGTH..=KEY_MAX_LENGTH).contains(&len) { Ok(()) } else { Err(CipherError::KeyLength(len)) }
}
