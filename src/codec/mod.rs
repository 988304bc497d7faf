//! Codecs built on the cipher core.
//!
//! - [`StringCodec`]: in-memory bytes to a checksummed hex frame
//! - [`FileCodec`]: one stream across the whole file
//! - [`ParallelFileCodec`]: one stream per worker range; output depends on the thread count

pub mod file;
pub mod parallel;
pub mod string;

pub use file::FileCodec;
pub use parallel::ParallelFileCodec;
pub use string::StringCodec;
