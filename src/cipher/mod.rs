//! # Chaotic Cipher Core
//!
//! The cipher is built in layers:
//! - **Digest Layer**: SHA-256 of the password and CRC-32 frame checksums ([`digest`])
//! - **Schedule Layer**: password digest to chaotic-map parameters ([`schedule`])
//! - **Stream Layer**: chaotic maps iterated into keystream bytes ([`stream`])
//! - **Diffusion Layer**: chained row/column XOR over square blocks ([`diffusion`])
//!
//! This is not a vetted cipher. Its arithmetic is frozen for compatibility with
//! ciphertext already in circulation, including the degenerate three-variable map.

pub mod diffusion;
pub mod digest;
pub mod schedule;
pub mod stream;

pub use diffusion::{BlockCipher, decode_block, encode_block};
pub use digest::{Checksum, KeyDigest};
pub use schedule::{PlanarParams, SpatialParams};
pub use stream::{ChaosStream, Keystream, LinearMapStream, SineMapStream};
