use secrecy::{ExposeSecret, SecretString};

use crate::error::{CipherError, check_key_length};

/// A validated cipher key. The text is wiped from memory on drop.
pub struct Secret {
    inner: SecretString,
}

impl Secret {
    /// Wraps `key` after checking its length.
    pub fn new(key: &str) -> Result<Self, CipherError> {
        check_key_length(key)?;
        Ok(Self { inner: SecretString::from(key.to_owned()) })
    }

    pub fn from_string(key: String) -> Result<Self, CipherError> {
        check_key_length(&key)?;
        Ok(Self { inner: SecretString::from(key) })
    }

    pub fn expose_secret(&self) -> &str {
        self.inner.expose_secret()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret([... {} bytes ...])", self.inner.expose_secret().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_rejects_short_key() {
        assert_eq!(Secret::new("short").unwrap_err(), CipherError::KeyLength(5));
    }

    #[test]
    fn test_secret_debug_hides_key() {
        let secret = Secret::from_string("12345678".to_owned()).unwrap();
        assert_eq!(format!("{secret:?}"), "Secret([... 8 bytes ...])");
        assert_eq!(secret.expose_secret(), "12345678");
    }
}
