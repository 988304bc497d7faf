//! Masked key entry.

use anyhow::{Context, Result};
use inquire::validator::{MaxLengthValidator, MinLengthValidator};
use inquire::{Password, PasswordDisplayMode};

use crate::config::{KEY_MAX_LENGTH, KEY_MIN_LENGTH};
use crate::secret::Secret;
use crate::types::Processing;

/// Reads a key from the terminal.
///
/// Encryption asks for the key twice, decryption once.
pub fn prompt_key(processing: Processing) -> Result<Secret> {
    let message = match processing {
        Processing::Encryption => "Enter encryption key:",
        Processing::Decryption => "Enter decryption key:",
    };

    let prompt = Password::new(message)
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_validator(MinLengthValidator::new(KEY_MIN_LENGTH).with_message(format!("Key must be at least {KEY_MIN_LENGTH} characters")))
        .with_validator(MaxLengthValidator::new(KEY_MAX_LENGTH).with_message(format!("Key must be at most {KEY_MAX_LENGTH} characters")));

    let key = match processing {
        Processing::Encryption => prompt.with_custom_confirmation_message("Confirm key:").with_custom_confirmation_error_message("Keys do not match").prompt(),
        Processing::Decryption => prompt.without_confirmation().prompt(),
    }
    .context("key input failed")?;

    Ok(Secret::from_string(key)?)
}
