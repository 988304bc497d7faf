//! Block partitioning.
//!
//! A payload of `len` bytes is tiled by square blocks, largest first: while more than
//! [`MIN_BLOCK_AREA`] bytes remain, the next block has side `floor(sqrt(min(remaining,
//! MAX_BLOCK_AREA)))`. Whatever is left (1 to 16 bytes) gets one fixed 4×4 block, even
//! when it does not fill it; callers copy only the bytes that actually remain.

use crate::config::{MAX_BLOCK_AREA, MIN_BLOCK_AREA, MIN_BLOCK_SIDE};

/// A square block of `side × side` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDescriptor {
    /// Bytes in the block, always `side * side`.
    pub area: usize,
    pub side: usize,
}

impl BlockDescriptor {
    #[inline]
    pub fn with_side(side: usize) -> Self {
        Self { area: side * side, side }
    }
}

/// Iterator over the block plan of a payload.
#[derive(Debug, Clone)]
pub struct Partition {
    remaining: u64,
}

impl Partition {
    #[inline]
    pub fn new(len: u64) -> Self {
        Self { remaining: len }
    }
}

impl Iterator for Partition {
    type Item = BlockDescriptor;

    fn next(&mut self) -> Option<BlockDescriptor> {
        if self.remaining == 0 {
            return None;
        }

        if self.remaining <= MIN_BLOCK_AREA as u64 {
            self.remaining = 0;
            return Some(BlockDescriptor::with_side(MIN_BLOCK_SIDE));
        }

        let span = self.remaining.min(MAX_BLOCK_AREA as u64);
        let block = BlockDescriptor::with_side(usize::try_from(span.isqrt()).unwrap_or(MIN_BLOCK_SIDE));
        self.remaining -= block.area as u64;
        Some(block)
    }
}

/// Collects the block plan for `len` bytes.
pub fn plan(len: u64) -> Vec<BlockDescriptor> {
    Partition::new(len).collect()
}

/// A planned block together with the payload bytes it actually carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Offset of the block's first byte inside the payload.
    pub offset: u64,
    /// Payload bytes covered, `min(block.area, bytes remaining)`.
    pub len: usize,
    pub block: BlockDescriptor,
}

/// Iterates the plan for `len` bytes with payload offsets and true lengths.
pub fn spans(len: u64) -> impl Iterator<Item = Span> {
    Partition::new(len).scan(0u64, move |offset, block| {
        let start = *offset;
        let take = (len - start).min(block.area as u64);
        *offset += take;
        Some(Span { offset: start, len: usize::try_from(take).unwrap_or(block.area), block })
    })
}
