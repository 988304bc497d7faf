//! ChaosCrypt - chaotic-map block diffusion for strings and files.
//!
//! A password is hashed with SHA-256 and folded into the initial conditions of a chaotic
//! map. The map's trajectory supplies keystream bytes that are chained through square
//! blocks of the payload by row and column XOR passes.
//! - String mode produces an uppercase hex frame with a length prefix and a CRC-32 trailer
//! - File mode writes a length prefix and the diffused bytes, sequentially or split
//!   across a fixed number of worker threads
//!
//! The construction is not authenticated and has not been analysed; file mode detects
//! neither a wrong key nor a wrong thread count.

pub mod api;
pub mod app;
pub mod cipher;
pub mod codec;
pub mod config;
pub mod error;
pub mod file;
pub mod framing;
pub mod partition;
pub mod secret;
pub mod types;
pub mod ui;
