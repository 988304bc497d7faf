//! Global Configuration Constants
//!
//! Every tunable of the cipher lives here. Most of these values are part of the
//! ciphertext format: changing any of the numeric constants below makes files and
//! strings produced by earlier builds undecodable.

/// Application name used in user interfaces.
pub const APP_NAME: &str = "ChaosCrypt";

/// File extension appended to encrypted files by the CLI.
pub const FILE_EXTENSION: &str = ".chx";

// === Key Constraints ===

/// Minimum accepted key length in bytes.
pub const KEY_MIN_LENGTH: usize = 8;

/// Maximum accepted key length in bytes.
pub const KEY_MAX_LENGTH: usize = 256;

// === Block Geometry ===

/// Largest block side. A full block therefore holds 1 MiB.
pub const MAX_BLOCK_SIDE: usize = 1024;

/// Side of the fixed remainder block.
pub const MIN_BLOCK_SIDE: usize = 4;

/// Largest block area in bytes.
pub const MAX_BLOCK_AREA: usize = MAX_BLOCK_SIDE * MAX_BLOCK_SIDE;

/// Area of the fixed remainder block in bytes.
pub const MIN_BLOCK_AREA: usize = MIN_BLOCK_SIDE * MIN_BLOCK_SIDE;

/// Filler for the unused tail of a partially populated block (ASCII `'0'`).
pub const PAD_BYTE: u8 = b'0';

// === Chaotic Map Constants ===

/// Iterations discarded before each keystream draw.
pub const WARMUP_ITERATIONS: usize = 200;

/// Approximation of pi baked into the sine map. Must not be replaced by `consts::PI`.
pub const MAP_PI: f64 = 3.141_592_6;

/// Scale applied to a state variable before it is reduced to a byte.
pub const BYTE_SCALE: f64 = 1e16;

/// Modulus used when reducing a scaled state variable to a byte.
pub const BYTE_MODULUS: f64 = 255.0;

// === Framing ===

/// Number of hex characters in the trailing string checksum.
pub const CHECKSUM_LEN: usize = 8;

/// Number of hex characters declaring the bit width of a length prefix.
pub const PREFIX_WIDTH_LEN: usize = 2;

// === Concurrency ===

/// Thread count used by the CLI when `--threads` is given without a value.
pub const DEFAULT_THREADS: usize = 4;
