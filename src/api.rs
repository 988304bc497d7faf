//! Result-value entry points.
//!
//! Nothing here returns `Err` or panics on bad input: every call yields an outcome with a
//! success flag, the payload on success and a readable message on failure. This is the
//! surface a foreign-function wrapper would sit on.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::warn;

use crate::codec::{FileCodec, ParallelFileCodec, StringCodec};
use crate::secret::Secret;
use crate::types::Metrics;

/// Outcome of a string operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOutcome {
    pub success: bool,
    /// Ciphertext frame or recovered plaintext; empty on failure.
    pub text: String,
    pub error: Option<String>,
}

impl TextOutcome {
    fn from_result(result: Result<String>) -> Self {
        match result {
            Ok(text) => Self { success: true, text, error: None },
            Err(e) => {
                warn!("string operation failed: {e:#}");
                Self { success: false, text: String::new(), error: Some(format!("{e:#}")) }
            }
        }
    }
}

/// Outcome of a file operation.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub success: bool,
    pub millis: u64,
    pub bytes: u64,
    /// Throughput in Gbit/s.
    pub speed: f64,
    pub error: Option<String>,
}

impl FileOutcome {
    fn from_result(result: Result<Metrics>) -> Self {
        match result {
            Ok(metrics) => Self { success: true, millis: metrics.millis, bytes: metrics.bytes, speed: metrics.speed, error: None },
            Err(e) => {
                warn!("file operation failed: {e:#}");
                Self { success: false, millis: 0, bytes: 0, speed: 0.0, error: Some(format!("{e:#}")) }
            }
        }
    }

    /// `SUCCESS|<millis>|<speed>` or `ERROR|<message>`.
    pub fn status_line(&self) -> String {
        match &self.error {
            None if self.success => format!("SUCCESS|{}|{:.6}", self.millis, self.speed),
            Some(message) => format!("ERROR|{message}"),
            None => "ERROR|unknown failure".to_owned(),
        }
    }
}

/// Encrypts `plaintext` into a hex frame.
pub fn encrypt(key: &str, plaintext: &str) -> TextOutcome {
    TextOutcome::from_result(Secret::new(key).map_err(Into::into).and_then(|secret| StringCodec::new(&secret).encrypt(plaintext.as_bytes())))
}

/// Decrypts a hex frame back to text.
pub fn decrypt(key: &str, frame: &str) -> TextOutcome {
    TextOutcome::from_result(Secret::new(key).map_err(Into::into).and_then(|secret| StringCodec::new(&secret).decrypt_text(frame)))
}

pub fn encrypt_file(key: &str, input: &Path, output: &Path) -> FileOutcome {
    timed(|| FileCodec::new(&Secret::new(key)?).encrypt(input, output, None))
}

pub fn decrypt_file(key: &str, input: &Path, output: &Path) -> FileOutcome {
    timed(|| FileCodec::new(&Secret::new(key)?).decrypt(input, output, None))
}

/// Encrypts with `threads` workers. The same count must be used to decrypt.
pub fn encrypt_file_with_threads(key: &str, input: &Path, output: &Path, threads: usize) -> FileOutcome {
    timed(|| ParallelFileCodec::new(&Secret::new(key)?, threads)?.encrypt(input, output, None))
}

pub fn decrypt_file_with_threads(key: &str, input: &Path, output: &Path, threads: usize) -> FileOutcome {
    timed(|| ParallelFileCodec::new(&Secret::new(key)?, threads)?.decrypt(input, output, None))
}

fn timed(op: impl FnOnce() -> Result<u64>) -> FileOutcome {
    let start = Instant::now();
    FileOutcome::from_result(op().map(|bytes| Metrics::new(bytes, start.elapsed())))
}

/// Hardware-accelerated entry points.
///
/// They are part of the public surface but no accelerated backend exists, so every call
/// reports failure without touching its inputs.
pub mod hardware {
    use std::path::Path;

    use super::{FileOutcome, TextOutcome};

    const UNAVAILABLE: &str = "hardware acceleration is not available";

    pub fn is_available() -> bool {
        false
    }

    pub fn encrypt(_key: &str, _plaintext: &str) -> TextOutcome {
        TextOutcome { success: false, text: String::new(), error: Some(UNAVAILABLE.to_owned()) }
    }

    pub fn decrypt(_key: &str, _frame: &str) -> TextOutcome {
        TextOutcome { success: false, text: String::new(), error: Some(UNAVAILABLE.to_owned()) }
    }

    pub fn encrypt_file(_key: &str, _input: &Path, _output: &Path) -> FileOutcome {
        unavailable()
    }

    pub fn decrypt_file(_key: &str, _input: &Path, _output: &Path) -> FileOutcome {
        unavailable()
    }

    fn unavailable() -> FileOutcome {
        FileOutcome { success: false, millis: 0, bytes: 0, speed: 0.0, error: Some(UNAVAILABLE.to_owned()) }
    }
}
