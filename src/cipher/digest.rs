//! Hash and checksum primitives.
//!
//! - [`KeyDigest`]: SHA-256 of the password, kept as hex text. The key schedule reads the
//!   hex characters themselves, not the raw digest bytes.
//! - [`Checksum`]: CRC-32 of a string frame, rendered as 8 uppercase hex characters. It
//!   detects corruption only; it carries no key material.

use sha2::{Digest as _, Sha256};
use subtle::ConstantTimeEq;

use crate::config::CHECKSUM_LEN;
use crate::error::CipherError;

/// Hex-encoded SHA-256 digest of a password.
pub struct KeyDigest {
    hex: String,
}

impl KeyDigest {
    /// Hashes the password bytes.
    pub fn new(password: &[u8]) -> Self {
        Self { hex: hex::encode(Sha256::digest(password)) }
    }

    /// The 64-character lowercase hex digest.
    #[inline]
    pub fn as_hex(&self) -> &str {
        &self.hex
    }
}

/// CRC-32 checksum of a frame body.
pub struct Checksum {
    hex: String,
}

impl Checksum {
    pub fn new(data: &[u8]) -> Self {
        Self { hex: format!("{:08X}", crc32fast::hash(data)) }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.hex
    }

    /// Compares against the checksum carried by a frame. The comparison is case sensitive.
    pub fn verify(&self, expected: &[u8]) -> Result<(), CipherError> {
        if expected.len() == CHECKSUM_LEN && bool::from(self.hex.as_bytes().ct_eq(expected)) {
            Ok(())
        } else {
            Err(CipherError::ChecksumMismatch)
        }
    }
}
