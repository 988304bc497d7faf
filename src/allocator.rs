//! Global allocator.
//!
//! The codecs allocate one block buffer per range (up to 1 MiB each) and the string
//! path builds several short-lived `String`s per call; mimalloc replaces the system
//! allocator for the binary only.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
