//! # Key Schedule
//!
//! Turns a password into the initial conditions and control parameters of a chaotic map.
//! The schedule is a pure function of the password's SHA-256 hex digest:
//!
//! 1. The 64 hex characters are split into four 16-character chunks.
//! 2. Each chunk is folded into a single nibble by XOR-ing the value of every character.
//! 3. The four nibbles `s0..s3` are accumulated into `h1..h4` with weights 8, 4, 2, 1.
//! 4. Parameters are read off `h1..h4` through `mod 255` reductions.
//!
//! Two families exist. [`PlanarParams`] drive the two-variable sine map used for strings;
//! [`SpatialParams`] drive the three-variable linear map used for files.

use crate::cipher::digest::KeyDigest;

/// Scale applied to the planar control parameters.
const PLANAR_CONTROL_SCALE: f64 = 1e14;

/// Scale applied to initial conditions and to the spatial control parameters.
const CONDITION_SCALE: f64 = 1e4;

/// Parameters of the two-variable sine map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarParams {
    pub x0: f64,
    pub y0: f64,
    pub u: f64,
    pub r: f64,
}

/// Parameters of the three-variable linear map.
///
/// `l` is derived for format completeness; the map as shipped never reads it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialParams {
    pub x0: f64,
    pub y0: f64,
    pub z0: f64,
    pub u: f64,
    pub r: f64,
    pub l: f64,
}

/// Cumulative terms `h1..h4` read from a digest.
#[derive(Debug, Clone, Copy)]
struct Seeds {
    h1: f64,
    h2: f64,
    h3: f64,
    h4: f64,
}

impl Seeds {
    fn new(digest: &KeyDigest) -> Self {
        let hex = digest.as_hex().as_bytes();
        let nibble = |index: usize| f64::from(fold_nibbles(&hex[index * 16..(index + 1) * 16]));

        let h1 = nibble(0) / 256.0 * 8.0;
        let h2 = h1 + nibble(1) / 256.0 * 4.0;
        let h3 = h2 + nibble(2) / 256.0 * 2.0;
        let h4 = h3 + nibble(3) / 256.0;

        Self { h1, h2, h3, h4 }
    }
}

/// XOR of the values of a run of hex characters.
fn fold_nibbles(chunk: &[u8]) -> u8 {
    chunk.iter().fold(0, |acc, &c| acc ^ hex_value(c))
}

fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

/// `mod(value * scale, 255) / 256`, the reduction every parameter goes through.
#[inline]
fn reduce(value: f64, scale: f64) -> f64 {
    (value * scale).rem_euclid(255.0) / 256.0
}

impl PlanarParams {
    /// Keystream-seeding variant used by the string codec (`K = 16`).
    pub fn from_digest(digest: &KeyDigest) -> Self {
        let s = Seeds::new(digest);
        Self {
            u: 4.0 + reduce(s.h1 + s.h2, PLANAR_CONTROL_SCALE) * 16.0,
            r: 4.0 + reduce(s.h1 + s.h3, PLANAR_CONTROL_SCALE) * 16.0,
            x0: reduce(s.h2 + s.h4, CONDITION_SCALE),
            y0: reduce(s.h3 + s.h4, CONDITION_SCALE),
        }
    }

    /// Initialization-only variant (`K = 1`). Initial conditions are offset by 0.2 and 0.3.
    pub fn initial_from_digest(digest: &KeyDigest) -> Self {
        let s = Seeds::new(digest);
        Self {
            u: 4.0 + reduce(s.h1 + s.h2, PLANAR_CONTROL_SCALE),
            r: 4.0 + reduce(s.h1 + s.h3, PLANAR_CONTROL_SCALE),
            x0: 0.2 + reduce(s.h2 + s.h4, CONDITION_SCALE),
            y0: 0.3 + reduce(s.h3 + s.h4, CONDITION_SCALE),
        }
    }

    /// Hashes `key` and derives the keystream-seeding parameters.
    pub fn from_key(key: &str) -> Self {
        Self::from_digest(&KeyDigest::new(key.as_bytes()))
    }
}

impl SpatialParams {
    pub fn from_digest(digest: &KeyDigest) -> Self {
        let s = Seeds::new(digest);
        Self {
            u: 6.0 + reduce(s.h1 + s.h4, CONDITION_SCALE) * 16.0,
            r: 9.0 + reduce(s.h2 + s.h3, CONDITION_SCALE) * 16.0,
            l: 15.0 + reduce(s.h1 + s.h3, CONDITION_SCALE) * 16.0,
            x0: reduce(s.h2 + s.h4, CONDITION_SCALE),
            y0: reduce(s.h3 + s.h4, CONDITION_SCALE),
            z0: reduce(s.h1 + s.h2, CONDITION_SCALE),
        }
    }

    /// Hashes `key` and derives the file-mode parameters.
    pub fn from_key(key: &str) -> Self {
        Self::from_digest(&KeyDigest::new(key.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_nibbles() {
        assert_eq!(fold_nibbles(b"0000000000000000"), 0);
        assert_eq!(fold_nibbles(b"f"), 15);
        assert_eq!(fold_nibbles(b"ff"), 0);
        assert_eq!(fold_nibbles(b"1234"), 1 ^ 2 ^ 3 ^ 4);
        assert_eq!(fold_nibbles(b"aB"), 10 ^ 11);
    }

    #[test]
    fn test_reduce_is_nonnegative() {
        assert!(reduce(-1.0, 1.0) >= 0.0);
        assert_eq!(reduce(256.0, 1.0), 1.0 / 256.0);
    }

    #[test]
    fn test_planar_deterministic() {
        assert_eq!(PlanarParams::from_key("12345678"), PlanarParams::from_key("12345678"));
        assert_ne!(PlanarParams::from_key("12345678"), PlanarParams::from_key("87654321"));
    }

    #[test]
    fn test_planar_ranges() {
        for key in ["12345678", "correct horse battery staple", "\u{4f60}\u{597d}\u{4e16}\u{754c}!!"] {
            let p = PlanarParams::from_key(key);
            assert!((4.0..20.0).contains(&p.u), "u out of range: {}", p.u);
            assert!((4.0..20.0).contains(&p.r), "r out of range: {}", p.r);
            assert!((0.0..1.0).contains(&p.x0));
            assert!((0.0..1.0).contains(&p.y0));
        }
    }

    #[test]
    fn test_initial_variant_offsets() {
        let digest = KeyDigest::new(b"12345678");
        let seeding = PlanarParams::from_digest(&digest);
        let initial = PlanarParams::initial_from_digest(&digest);

        assert!((initial.x0 - 0.2 - seeding.x0).abs() < 1e-12);
        assert!((initial.y0 - 0.3 - seeding.y0).abs() < 1e-12);
        assert!((4.0..5.0).contains(&initial.u));
        assert!((4.0..5.0).contains(&initial.r));
    }

    #[test]
    fn test_spatial_ranges() {
        let p = SpatialParams::from_key("12345678");
        assert!((6.0..22.0).contains(&p.u));
        assert!((9.0..25.0).contains(&p.r));
        assert!((15.0..31.0).contains(&p.l));
        assert!((0.0..1.0).contains(&p.x0));
        assert!((0.0..1.0).contains(&p.y0));
        assert!((0.0..1.0).contains(&p.z0));
    }

    #[test]
    fn test_spatial_shares_conditions_with_planar() {
        let planar = PlanarParams::from_key("shared-initial-state");
        let spatial = SpatialParams::from_key("shared-initial-state");
        assert_eq!(planar.x0, spatial.x0);
        assert_eq!(planar.y0, spatial.y0);
    }
}
