//! Injectable randomness
//!
//! Score jitter, confidence figures and the mock extractor draw from a
//! [`RandomSource`] so runs can be pinned in tests and replayed from a seed.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Uniform random values in inclusive ranges
pub trait RandomSource: Send + Sync + fmt::Debug {
    /// Integer in `lo..=hi`
    fn int_in_range(&self, lo: i32, hi: i32) -> i32;

    /// Float in `lo..=hi`
    fn float_in_range(&self, lo: f64, hi: f64) -> f64;
}

/// Thread-local RNG, fresh per call
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn int_in_range(&self, lo: i32, hi: i32) -> i32 {
        rand::thread_rng().gen_range(lo..=hi)
    }

    fn float_in_range(&self, lo: f64, hi: f64) -> f64 {
        rand::thread_rng().gen_range(lo..=hi)
    }
}

/// Reproducible RNG seeded once at construction
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn int_in_range(&self, lo: i32, hi: i32) -> i32 {
        self.rng.lock().gen_range(lo..=hi)
    }

    fn float_in_range(&self, lo: f64, hi: f64) -> f64 {
        self.rng.lock().gen_range(lo..=hi)
    }
}

/// Constant source for deterministic runs
///
/// Returns the configured values clamped into whatever range is asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRandom {
    int: i32,
    float: f64,
}

impl FixedRandom {
    pub fn new(int: i32, float: f64) -> Self {
        Self { int, float }
    }

    /// No jitter; floats pinned to the bottom of their range
    pub fn zero() -> Self {
        Self::new(0, f64::MIN)
    }
}

impl RandomSource for FixedRandom {
    fn int_in_range(&self, lo: i32, hi: i32) -> i32 {
        self.int.clamp(lo, hi)
    }

    fn float_in_range(&self, lo: f64, hi: f64) -> f64 {
        self.float.clamp(lo, hi)
    }
}

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
