//! Block diffusion.
//!
//! A block is a `side × side` byte matrix in row-major order. Encoding runs two chained
//! XOR passes:
//!
//! - rows, ascending: `C[i] = P[i] ^ rot(X, i) ^ C[i-1]`
//! - columns, ascending: `E[:,j] = D[:,j] ^ rot(Y, j) ^ E[:,j-1]`
//!
//! where `rot(K, s)` reads `K[(p - s) mod side]` at position `p`. Decoding applies the
//! same formulas in the opposite pass order and with descending indices, so the
//! neighbour consumed at every step still holds its ciphertext value.

use crate::cipher::stream::{ChaosStream, Keystream};
use crate::config::PAD_BYTE;
use crate::partition::BlockDescriptor;
use crate::types::Processing;

/// Diffuses `matrix` in place.
pub fn encode_block(matrix: &mut [u8], keystream: &Keystream) {
    let side = keystream.side();
    debug_assert_eq!(matrix.len(), side * side);

    for i in 0..side {
        xor_row(matrix, side, i, &keystream.rows);
    }
    for j in 0..side {
        xor_col(matrix, side, j, &keystream.cols);
    }
}

/// Inverts [`encode_block`] in place.
///
/// The traversal order is the whole point: undoing column `j` needs column `j - 1`
/// untouched, so columns go high to low, then rows go high to low.
pub fn decode_block(matrix: &mut [u8], keystream: &Keystream) {
    let side = keystream.side();
    debug_assert_eq!(matrix.len(), side * side);

    for j in (0..side).rev() {
        xor_col(matrix, side, j, &keystream.cols);
    }
    for i in (0..side).rev() {
        xor_row(matrix, side, i, &keystream.rows);
    }
}

/// Keystream rotated right by `shift` positions.
#[inline]
fn rotated(key: &[u8], shift: usize) -> impl Iterator<Item = &u8> {
    let len = key.len();
    key.iter().cycle().skip(len - shift % len).take(len)
}

fn xor_row(matrix: &mut [u8], side: usize, i: usize, key: &[u8]) {
    let (before, from) = matrix.split_at_mut(i * side);
    let row = &mut from[..side];

    if i == 0 {
        for (cell, k) in row.iter_mut().zip(rotated(key, 0)) {
            *cell ^= k;
        }
    } else {
        let prev = &before[(i - 1) * side..];
        for ((cell, k), p) in row.iter_mut().zip(rotated(key, i)).zip(prev) {
            *cell ^= k ^ p;
        }
    }
}

fn xor_col(matrix: &mut [u8], side: usize, j: usize, key: &[u8]) {
    for (i, k) in rotated(key, j).enumerate() {
        let at = i * side + j;
        let prev = if j > 0 { matrix[at - 1] } else { 0 };
        matrix[at] ^= k ^ prev;
    }
}

/// Diffusion driven by one chaotic stream threaded across consecutive blocks.
pub struct BlockCipher<S> {
    stream: S,
}

impl<S: ChaosStream> BlockCipher<S> {
    #[inline]
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Draws a fresh keystream for `block` and encodes or decodes it in place.
    pub fn apply(&mut self, mode: Processing, block: &mut [u8], side: usize) {
        let keystream = self.stream.draw(side);
        match mode {
            Processing::Encryption => encode_block(block, &keystream),
            Processing::Decryption => decode_block(block, &keystream),
        }
    }

    /// Processes up to one block of payload.
    ///
    /// `chunk` may be shorter than the descriptor's area; the block is padded with
    /// [`PAD_BYTE`] and only `chunk.len()` bytes are copied back.
    pub fn apply_padded(&mut self, mode: Processing, chunk: &mut [u8], block: BlockDescriptor) {
        debug_assert!(chunk.len() <= block.area);

        if chunk.len() == block.area {
            self.apply(mode, chunk, block.side);
            return;
        }

        let mut buffer = vec![PAD_BYTE; block.area];
        buffer[..chunk.len()].copy_from_slice(chunk);
        self.apply(mode, &mut buffer, block.side);
        chunk.copy_from_slice(&buffer[..chunk.len()]);
    }
}
