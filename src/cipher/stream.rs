//! Chaotic keystream generators.
//!
//! A stream owns the mutable state of one chaotic map. Every [`ChaosStream::draw`]
//! advances that state irreversibly: the next draw continues the same trajectory.
//! Independent streams are built from the same parameter value, never shared.

use crate::cipher::schedule::{PlanarParams, SpatialParams};
use crate::config::{BYTE_MODULUS, BYTE_SCALE, MAP_PI, WARMUP_ITERATIONS};

/// Row and column keystreams for one `side × side` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keystream {
    /// Bytes taken from the `x` variable; drives the row pass.
    pub rows: Vec<u8>,
    /// Bytes taken from the `y` variable; drives the column pass.
    pub cols: Vec<u8>,
}

impl Keystream {
    #[inline]
    pub fn side(&self) -> usize {
        self.rows.len()
    }
}

/// A chaotic map iterated forward to produce keystream bytes.
pub trait ChaosStream {
    /// Advances the map by one iteration and returns the new `(x, y)`.
    fn step(&mut self) -> (f64, f64);

    /// Runs `side + WARMUP_ITERATIONS` iterations and keeps the last `side` of them.
    fn draw(&mut self, side: usize) -> Keystream {
        for _ in 0..WARMUP_ITERATIONS {
            self.step();
        }

        let mut rows = Vec::with_capacity(side);
        let mut cols = Vec::with_capacity(side);
        for _ in 0..side {
            let (x, y) = self.step();
            rows.push(to_byte(x));
            cols.push(to_byte(y));
        }

        Keystream { rows, cols }
    }
}

/// `round(mod(value * 1e16, 255))`; always within `0..=255`.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(value: f64) -> u8 {
    (value * BYTE_SCALE).rem_euclid(BYTE_MODULUS).round() as u8
}

/// One half-step of the sine map: `mod(sin(pi·a) + u·a·(1 - a), 1)` with `a = p + r·q`.
#[inline]
fn sine_logistic(p: f64, q: f64, u: f64, r: f64) -> f64 {
    let a = p + r * q;
    ((MAP_PI * a).sin() + u * a * (1.0 - a)).rem_euclid(1.0)
}

/// Two-variable sine map, used by the string codec.
#[derive(Debug, Clone)]
pub struct SineMapStream {
    x: f64,
    y: f64,
    u: f64,
    r: f64,
}

impl SineMapStream {
    pub fn new(params: PlanarParams) -> Self {
        Self { x: params.x0, y: params.y0, u: params.u, r: params.r }
    }
}

impl ChaosStream for SineMapStream {
    #[inline]
    fn step(&mut self) -> (f64, f64) {
        let x = sine_logistic(self.y, self.x, self.u, self.r);
        let y = sine_logistic(x, self.y, self.u, self.r);
        self.x = x;
        self.y = y;
        (x, y)
    }
}

/// Three-variable linear map, used by the file codecs.
///
/// Known weakness kept for ciphertext compatibility: `z` is pinned to `1` after every
/// iteration, so only the initial `z0` ever reaches the trajectory and the system
/// behaves as a two-variable linear recurrence.
#[derive(Debug, Clone)]
pub struct LinearMapStream {
    x: f64,
    y: f64,
    z: f64,
    u: f64,
    r: f64,
}

impl LinearMapStream {
    pub fn new(params: SpatialParams) -> Self {
        Self { x: params.x0, y: params.y0, z: params.z0, u: params.u, r: params.r }
    }
}

impl ChaosStream for LinearMapStream {
    #[inline]
    fn step(&mut self) -> (f64, f64) {
        let x = (self.u * self.x + self.u * self.y).rem_euclid(1.0);
        let y = (self.u * self.y + self.r * self.z).rem_euclid(1.0);
        self.x = x;
        self.y = y;
        self.z = 1.0;
        (x, y)
    }
}
