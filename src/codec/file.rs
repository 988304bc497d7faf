//! Single-threaded file encryption.
//!
//! The output is the ASCII length prefix of the plaintext size followed by the diffused
//! payload, byte for byte the same length as the input. One chaotic stream runs across
//! every block of the file. There is no integrity check in this format.

use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result, ensure};
use tracing::debug;

use crate::cipher::{BlockCipher, ChaosStream, LinearMapStream, SpatialParams};
use crate::config::PREFIX_WIDTH_LEN;
use crate::error::CipherError;
use crate::file::{check_paths, create_file, open_file};
use crate::framing::{encode_prefix, parse_length, parse_width};
use crate::partition::spans;
use crate::secret::Secret;
use crate::types::Processing;
use crate::ui::progress::Bar;

/// Sequential file codec.
pub struct FileCodec {
    params: SpatialParams,
}

impl FileCodec {
    pub fn new(secret: &Secret) -> Self {
        Self { params: SpatialParams::from_key(secret.expose_secret()) }
    }

    /// Encrypts `input` into `output` and returns the number of payload bytes.
    pub fn encrypt(&self, input: &Path, output: &Path, progress: Option<&Bar>) -> Result<u64> {
        check_paths(input, output)?;

        let source = open_file(input)?;
        let len = source.metadata().context("failed to read input metadata")?.len();

        let mut reader = BufReader::new(source);
        let mut writer = BufWriter::new(create_file(output)?);
        writer.write_all(encode_prefix(len).as_bytes()).context("failed to write length prefix")?;

        let mut cipher = BlockCipher::new(LinearMapStream::new(self.params));
        process_range(&mut cipher, Processing::Encryption, &mut reader, &mut writer, len, progress)?;
        writer.flush().context("failed to flush output")?;

        debug!(bytes = len, "encrypted file sequentially");
        Ok(len)
    }

    /// Decrypts `input` into `output` and returns the number of payload bytes.
    pub fn decrypt(&self, input: &Path, output: &Path, progress: Option<&Bar>) -> Result<u64> {
        check_paths(input, output)?;

        let source = open_file(input)?;
        let total = source.metadata().context("failed to read input metadata")?.len();

        let mut reader = BufReader::new(source);
        let (len, used) = read_prefix(&mut reader)?;
        check_payload_len(total, used, len)?;

        let mut writer = BufWriter::new(create_file(output)?);
        let mut cipher = BlockCipher::new(LinearMapStream::new(self.params));
        process_range(&mut cipher, Processing::Decryption, &mut reader, &mut writer, len, progress)?;
        writer.flush().context("failed to flush output")?;

        debug!(bytes = len, "decrypted file sequentially");
        Ok(len)
    }
}

/// Reads a length prefix from the start of `reader`.
///
/// Returns the declared payload length and the prefix size in bytes.
pub(crate) fn read_prefix<R: Read>(reader: &mut R) -> Result<(u64, usize)> {
    let mut header = [0u8; PREFIX_WIDTH_LEN];
    reader.read_exact(&mut header).map_err(|_| CipherError::MalformedFrame("truncated length prefix"))?;

    let digits = parse_width(&header)?;
    let mut body = vec![0u8; digits];
    reader.read_exact(&mut body).map_err(|_| CipherError::MalformedFrame("truncated length prefix"))?;

    Ok((parse_length(&body)?, PREFIX_WIDTH_LEN + digits))
}

/// The payload after the prefix must be exactly as long as the prefix says.
pub(crate) fn check_payload_len(total: u64, prefix_len: usize, declared: u64) -> Result<()> {
    let payload = total.saturating_sub(prefix_len as u64);
    ensure!(payload == declared, CipherError::MalformedFrame("payload length does not match prefix"));
    Ok(())
}

/// Streams `len` bytes from `reader` to `writer` through the block plan for `len`.
pub(crate) fn process_range<S, R, W>(cipher: &mut BlockCipher<S>, mode: Processing, reader: &mut R, writer: &mut W, len: u64, progress: Option<&Bar>) -> Result<()>
where
    S: ChaosStream,
    R: Read,
    W: Write,
{
    let mut buffer = vec![0u8; spans(len).next().map_or(0, |s| s.len)];

    for span in spans(len) {
        let chunk = &mut buffer[..span.len];
        reader.read_exact(chunk).with_context(|| format!("failed to read block at offset {}", span.offset))?;
        cipher.apply_padded(mode, chunk, span.block);
        writer.write_all(chunk).with_context(|| format!("failed to write block at offset {}", span.offset))?;

        if let Some(bar) = progress {
            bar.add(span.len as u64);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn codec(key: &str) -> FileCodec {
        FileCodec::new(&Secret::new(key).unwrap())
    }

    #[test]
    fn test_eighteen_byte_file() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("plain.txt");
        let sealed = dir.path().join("plain.txt.chx");
        let opened = dir.path().join("opened.txt");
        fs::write(&plain, b"eighteen bytes!!!\n").unwrap();

        let codec = codec("12345678");
        assert_eq!(codec.encrypt(&plain, &sealed, None).unwrap(), 18);

        let bytes = fs::read(&sealed).unwrap();
        assert_eq!(&bytes[..4], b"0812");
        assert_eq!(bytes.len(), 4 + 18);
        assert_ne!(&bytes[4..], b"eighteen bytes!!!\n");

        assert_eq!(codec.decrypt(&sealed, &opened, None).unwrap(), 18);
        assert_eq!(fs::read(&opened).unwrap(), b"eighteen bytes!!!\n");
    }

    #[test]
    fn test_known_ciphertext() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("counting.bin");
        let sealed = dir.path().join("counting.bin.chx");
        fs::write(&plain, (0..40u8).collect::<Vec<u8>>()).unwrap();

        codec("12345678").encrypt(&plain, &sealed, None).unwrap();
        assert_eq!(
            hex::encode_upper(fs::read(&sealed).unwrap()),
            "30383238838491F77EE9857109A4717612EB69AEA9E95627B197E3768CB2A59804E9F71475F24C76F8920AA1"
        );
    }

    #[test]
    fn test_same_input_and_output_keeps_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("precious.txt");
        fs::write(&path, b"precious data that must survive").unwrap();

        let codec = codec("12345678");
        let err = codec.encrypt(&path, &path, None).unwrap_err();
        assert_eq!(err.downcast_ref::<CipherError>(), Some(&CipherError::SamePath));
        assert!(codec.decrypt(&path, &path, None).is_err());

        assert_eq!(fs::read(&path).unwrap(), b"precious data that must survive");
    }

    #[test]
    fn test_multi_block_roundtrip_with_progress() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("plain.bin");
        let sealed = dir.path().join("plain.bin.chx");
        let opened = dir.path().join("opened.bin");
        let data: Vec<u8> = (0..70_001u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8).collect();
        fs::write(&plain, &data).unwrap();

        let codec = codec("multi-block-file");
        let bar = Bar::hidden();
        codec.encrypt(&plain, &sealed, Some(&bar)).unwrap();
        assert_eq!(bar.position(), 70_001);

        codec.decrypt(&sealed, &opened, None).unwrap();
        assert_eq!(fs::read(&opened).unwrap(), data);
    }

    #[test]
    fn test_wrong_key_yields_garbage() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("plain.txt");
        let sealed = dir.path().join("sealed.chx");
        let opened = dir.path().join("opened.txt");
        fs::write(&plain, b"no integrity check in file mode").unwrap();

        codec("right-key-1").encrypt(&plain, &sealed, None).unwrap();
        codec("wrong-key-1").decrypt(&sealed, &opened, None).unwrap();

        assert_ne!(fs::read(&opened).unwrap(), b"no integrity check in file mode");
    }

    #[test]
    fn test_empty_file() {
        let dir = tempdir().unwrap();
        let plain = dir.path().join("empty");
        let sealed = dir.path().join("empty.chx");
        let opened = dir.path().join("empty.out");
        fs::write(&plain, b"").unwrap();

        let codec = codec("12345678");
        assert_eq!(codec.encrypt(&plain, &sealed, None).unwrap(), 0);
        assert_eq!(fs::read(&sealed).unwrap(), b"0800");

        assert_eq!(codec.decrypt(&sealed, &opened, None).unwrap(), 0);
        assert!(fs::read(&opened).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_payload_rejected() {
        let dir = tempdir().unwrap();
        let sealed = dir.path().join("cut.chx");
        let opened = dir.path().join("cut.out");
        fs::write(&sealed, b"0812abc").unwrap();

        let err = codec("12345678").decrypt(&sealed, &opened, None).unwrap_err();
        assert!(matches!(err.downcast_ref::<CipherError>(), Some(CipherError::MalformedFrame(_))));
    }

    #[test]
    fn test_missing_input_and_empty_path() {
        let dir = tempdir().unwrap();
        let codec = codec("12345678");

        let err = codec.encrypt(&dir.path().join("missing"), &dir.path().join("out"), None).unwrap_err();
        assert!(err.to_string().contains("cannot open input file"));

        let err = codec.encrypt(Path::new(""), &dir.path().join("out"), None).unwrap_err();
        assert_eq!(err.downcast_ref::<CipherError>(), Some(&CipherError::EmptyPath));
    }

    #[test]
    fn test_read_prefix() {
        let mut cursor = std::io::Cursor::new(b"10012Crest".to_vec());
        assert_eq!(read_prefix(&mut cursor).unwrap(), (300, 6));

        let mut short = std::io::Cursor::new(b"10".to_vec());
        assert!(read_prefix(&mut short).is_err());
    }
}
