//! Multi-threaded file encryption.
//!
//! The payload is cut into `N` equal contiguous ranges of `S = len / N` bytes, one per
//! worker, plus a tail of `len - N·S` bytes handled by the calling thread. Every range
//! gets its own block plan and its own stream seeded from the same parameters, so the
//! ciphertext depends on `N`: decrypting with a different thread count yields garbage.
//! With `N = 1` the output is identical to [`FileCodec`](super::FileCodec).
//!
//! Workers read through private handles and write through one shared handle guarded by
//! a mutex. Target offsets are fixed before any write, so ranges never overlap.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use tracing::debug;

use super::file::{check_payload_len, read_prefix};
use crate::cipher::{BlockCipher, LinearMapStream, SpatialParams};
use crate::error::CipherError;
use crate::file::{check_paths, create_file, file_size, open_file};
use crate::framing::encode_prefix;
use crate::partition::spans;
use crate::secret::Secret;
use crate::types::Processing;
use crate::ui::progress::Bar;

/// Where the payload sits in the input and where it goes in the output.
#[derive(Debug, Clone, Copy)]
struct Layout {
    len: u64,
    read_base: u64,
    write_base: u64,
}

/// File codec running a fixed pool of worker threads.
pub struct ParallelFileCodec {
    params: SpatialParams,
    threads: usize,
}

impl ParallelFileCodec {
    pub fn new(secret: &Secret, threads: usize) -> Result<Self, CipherError> {
        if threads == 0 {
            return Err(CipherError::NoThreads);
        }
        Ok(Self { params: SpatialParams::from_key(secret.expose_secret()), threads })
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn encrypt(&self, input: &Path, output: &Path, progress: Option<&Bar>) -> Result<u64> {
        check_paths(input, output)?;

        let len = file_size(input)?;
        let prefix = encode_prefix(len);

        let mut out = create_file(output)?;
        out.write_all(prefix.as_bytes()).context("failed to write length prefix")?;
        out.set_len(prefix.len() as u64 + len).context("failed to pre-size output")?;

        let layout = Layout { len, read_base: 0, write_base: prefix.len() as u64 };
        self.run(Processing::Encryption, input, out, layout, progress)?;
        Ok(len)
    }

    pub fn decrypt(&self, input: &Path, output: &Path, progress: Option<&Bar>) -> Result<u64> {
        check_paths(input, output)?;

        let total = file_size(input)?;
        let (len, used) = read_prefix(&mut BufReader::new(open_file(input)?))?;
        check_payload_len(total, used, len)?;

        let out = create_file(output)?;
        out.set_len(len).context("failed to pre-size output")?;

        let layout = Layout { len, read_base: used as u64, write_base: 0 };
        self.run(Processing::Decryption, input, out, layout, progress)?;
        Ok(len)
    }

    /// Runs the workers, then diffuses the tail on the calling thread.
    ///
    /// The tail gets its own block plan and may span several blocks when `N >= 18`.
    /// Multi-threaded files whose tail was stored as raw plaintext do not decode here.
    fn run(&self, mode: Processing, input: &Path, out: File, layout: Layout, progress: Option<&Bar>) -> Result<()> {
        let threads = self.threads as u64;
        let share = layout.len / threads;
        let output = Mutex::new(out);

        debug!(threads, share, tail = layout.len - share * threads, %mode, "starting parallel pass");

        if share > 0 {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(self.threads).build().context("failed to build worker pool")?;
            pool.install(|| (0..threads).into_par_iter().try_for_each(|t| self.process_range(mode, input, &output, layout, t * share, share, progress)))?;
        }

        let tail_start = share * threads;
        if tail_start < layout.len {
            self.process_range(mode, input, &output, layout, tail_start, layout.len - tail_start, progress)?;
        }

        let mut out = output.into_inner().map_err(|_| anyhow!("output lock poisoned"))?;
        out.flush().context("failed to flush output")?;
        Ok(())
    }

    /// Diffuses payload bytes `[start, start + len)` with a freshly seeded stream.
    #[allow(clippy::too_many_arguments)]
    fn process_range(&self, mode: Processing, input: &Path, output: &Mutex<File>, layout: Layout, start: u64, len: u64, progress: Option<&Bar>) -> Result<()> {
        let mut reader = BufReader::new(open_file(input)?);
        reader.seek(SeekFrom::Start(layout.read_base + start)).context("failed to seek input")?;

        let mut cipher = BlockCipher::new(LinearMapStream::new(self.params));
        let mut buffer = vec![0u8; spans(len).next().map_or(0, |s| s.len)];

        for span in spans(len) {
            let chunk = &mut buffer[..span.len];
            reader.read_exact(chunk).with_context(|| format!("failed to read block at offset {}", start + span.offset))?;
            cipher.apply_padded(mode, chunk, span.block);

            {
                let mut file = output.lock().map_err(|_| anyhow!("output lock poisoned"))?;
                file.seek(SeekFrom::Start(layout.write_base + start + span.offset)).context("failed to seek output")?;
                file.write_all(chunk).with_context(|| format!("failed to write block at offset {}", start + span.offset))?;
            }

            if let Some(bar) = progress {
                bar.add(span.len as u64);
            }
        }

        Ok(())
    }
}
