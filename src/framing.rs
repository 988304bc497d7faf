//! Self-describing length prefixes.
//!
//! A prefix is ASCII hex text: two characters holding the bit width of the length, then
//! the length itself, one byte (two characters) at a time, most significant first.
//! Only the significant bytes are written, so `5` is `"0805"` and `300` is `"10012C"`.
//!
//! ```text
//! [ width: 2 hex ][ length: width / 4 hex ][ payload ... ]
//! ```

use anyhow::{Context, Result, ensure};

use crate::config::PREFIX_WIDTH_LEN;
use crate::error::CipherError;

/// Largest accepted bit width (a full `u64`).
const MAX_WIDTH_BITS: usize = 64;

/// Renders the prefix for `len`.
pub fn encode_prefix(len: u64) -> String {
    let bytes = len.to_be_bytes();
    let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len() - 1);
    let significant = &bytes[first..];

    let mut prefix = format!("{:02X}", significant.len() * 8);
    prefix.push_str(&hex::encode_upper(significant));
    prefix
}

/// Number of hex characters following the width field for a given width header.
pub fn parse_width(header: &[u8]) -> Result<usize> {
    ensure!(header.len() == PREFIX_WIDTH_LEN, CipherError::MalformedFrame("truncated length prefix"));

    ensure!(header.iter().all(u8::is_ascii_hexdigit), CipherError::MalformedFrame("length prefix width is not hex"));

    let text = std::str::from_utf8(header).map_err(|_| CipherError::MalformedFrame("non-ASCII length prefix"))?;
    let bits = usize::from_str_radix(text, 16).map_err(|_| CipherError::MalformedFrame("length prefix width is not hex"))?;
    ensure!(bits > 0 && bits % 8 == 0 && bits <= MAX_WIDTH_BITS, CipherError::MalformedFrame("unsupported length prefix width"));

    Ok(bits / 4)
}

/// Parses the length digits that follow the width field.
pub fn parse_length(digits: &[u8]) -> Result<u64> {
    ensure!(digits.iter().all(u8::is_ascii_hexdigit), CipherError::MalformedFrame("length prefix is not hex"));

    let text = std::str::from_utf8(digits).map_err(|_| CipherError::MalformedFrame("non-ASCII length prefix"))?;
    u64::from_str_radix(text, 16).map_err(|_| CipherError::MalformedFrame("length prefix is not hex").into())
}

/// Splits a prefix off the front of `frame`.
///
/// Returns the decoded length and the number of characters the prefix occupied.
pub fn decode_prefix(frame: &[u8]) -> Result<(u64, usize)> {
    let header = frame.get(..PREFIX_WIDTH_LEN).ok_or(CipherError::MalformedFrame("truncated length prefix"))?;
    let digits = parse_width(header)?;

    let end = PREFIX_WIDTH_LEN + digits;
    let body = frame.get(PREFIX_WIDTH_LEN..end).ok_or(CipherError::MalformedFrame("truncated length prefix"))?;
    let len = parse_length(body).context("invalid length prefix")?;

    Ok((len, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_small() {
        assert_eq!(encode_prefix(5), "0805");
        assert_eq!(encode_prefix(10), "080A");
        assert_eq!(encode_prefix(255), "08FF");
    }

    #[test]
    fn test_encode_multibyte() {
        assert_eq!(encode_prefix(256), "100100");
        assert_eq!(encode_prefix(300), "10012C");
        assert_eq!(encode_prefix(0x0100_0000), "2001000000");
        assert_eq!(encode_prefix(u64::MAX), "40FFFFFFFFFFFFFFFF");
    }

    #[test]
    fn test_encode_zero() {
        assert_eq!(encode_prefix(0), "0800");
        assert_eq!(decode_prefix(b"0800").unwrap(), (0, 4));
    }

    #[test]
    fn test_decode_with_trailing_payload() {
        let (len, used) = decode_prefix(b"10012Cdeadbeef").unwrap();
        assert_eq!(len, 300);
        assert_eq!(used, 6);
    }

    #[test]
    fn test_decode_accepts_lowercase() {
        assert_eq!(decode_prefix(b"10012c").unwrap(), (300, 6));
    }

    #[test]
    fn test_decode_roundtrip_boundaries() {
        for len in [1u64, 18, 255, 256, 65_535, 65_536, 1 << 40, u64::MAX] {
            let prefix = encode_prefix(len);
            assert_eq!(decode_prefix(prefix.as_bytes()).unwrap(), (len, prefix.len()));
        }
    }

    #[test]
    fn test_decode_rejects_bad_width() {
        for frame in [&b"0"[..], b"00", b"07FF", b"4800000000000000000000", b"ZZ00"] {
            let err = decode_prefix(frame).unwrap_err();
            assert!(matches!(err.downcast_ref::<CipherError>(), Some(CipherError::MalformedFrame(_))), "{frame:?}");
        }
    }

    #[test]
    fn test_decode_rejects_truncated_digits() {
        assert!(decode_prefix(b"1001").is_err());
        assert!(decode_prefix(b"08G1").is_err());
    }

    #[test]
    fn test_decode_rejects_sign() {
        for frame in [&b"08+5"[..], b"+8FF", b"10+12C", b"08-1"] {
            let err = decode_prefix(frame).unwrap_err();
            assert!(matches!(err.root_cause().downcast_ref::<CipherError>(), Some(CipherError::MalformedFrame(_))), "{frame:?}");
        }
        assert!(parse_length(b"+5").is_err());
        assert!(parse_width(b"+8").is_err());
    }
}
