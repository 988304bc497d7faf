//! Common type definitions for ChaosCrypt.
//!
//! - [`ProcessorMode`]: what the user asked for, used by the CLI for paths and messages
//! - [`Processing`]: the direction a codec runs its blocks in
//! - [`Metrics`]: timing and throughput of one file operation

use std::time::Duration;

use strum::Display;

/// The file operation requested from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ProcessorMode {
    /// Encrypt the file, producing a `.chx` output.
    Encrypt,

    /// Decrypt the file, removing the `.chx` extension.
    Decrypt,
}

/// Direction in which blocks are diffused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Processing {
    #[strum(to_string = "Encrypting...")]
    Encryption,

    #[strum(to_string = "Decrypting...")]
    Decryption,
}

impl Processing {
    /// Converts a `Processing` to its corresponding `ProcessorMode`.
    #[inline]
    pub fn mode(self) -> ProcessorMode {
        match self {
            Self::Encryption => ProcessorMode::Encrypt,
            Self::Decryption => ProcessorMode::Decrypt,
        }
    }
}

impl From<ProcessorMode> for Processing {
    fn from(mode: ProcessorMode) -> Self {
        match mode {
            ProcessorMode::Encrypt => Self::Encryption,
            ProcessorMode::Decrypt => Self::Decryption,
        }
    }
}

/// Timing of one completed file operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Wall-clock time in milliseconds.
    pub millis: u64,
    /// Payload bytes processed (plaintext length).
    pub bytes: u64,
    /// Throughput in Gbit/s; zero when the operation was too fast to time.
    pub speed: f64,
}

impl Metrics {
    #[allow(clippy::cast_precision_loss)]
    pub fn new(bytes: u64, elapsed: Duration) -> Self {
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let seconds = elapsed.as_secs_f64();
        let speed = if seconds > 0.0 { bytes as f64 * 8.0 / 1024.0 / 1024.0 / 1024.0 / seconds } else { 0.0 };
        Self { millis, bytes, speed }
    }
}
