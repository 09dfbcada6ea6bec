// Injectable random source for all simulation engines
//
// Every stochastic transition in the simulation draws from a SimRng owned
// by the session, never from thread-local randomness. Seeding the generator
// makes a whole session replayable tick for tick.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Characters used in uppercase record identifiers
const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Seeded random source shared by all engines of a session
#[derive(Debug, Clone)]
pub struct SimRng {
    inner: ChaCha8Rng,
}

impl SimRng {
    /// Deterministic generator from an explicit seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }

    /// Single Bernoulli trial
    pub fn chance(&mut self, probability: f64) -> bool {
        self.inner.gen::<f64>() < probability
    }

    /// Uniform sample in [0, 1)
    pub fn unit(&mut self) -> f64 {
        self.inner.gen()
    }

    /// Uniform sample in [lo, hi)
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        self.inner.gen_range(lo..hi)
    }

    /// Uniform sample in [lo, hi)
    pub fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        self.inner.gen_range(lo..hi)
    }

    /// Centered jitter in [-width/2, width/2)
    pub fn drift(&mut self, width: f64) -> f64 {
        (self.unit() - 0.5) * width
    }

    /// One bounded random-walk step: value + centered jitter, clamped
    pub fn walk(&mut self, value: f64, width: f64, min: f64, max: f64) -> f64 {
        (value + self.drift(width)).clamp(min, max)
    }

    /// Uniform step in {-1, 0, +1}
    pub fn step(&mut self) -> i8 {
        self.inner.gen_range(-1i8..=1i8)
    }

    /// Uniform pick from a slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.inner.gen_range(0..items.len())]
    }

    /// Identifier with an uppercase alphanumeric suffix ("RF" -> "RF3K9ZQ2")
    pub fn token(&mut self, prefix: &str, suffix_len: usize) -> String {
        let mut id = String::with_capacity(prefix.len() + suffix_len);
        id.push_str(prefix);
        for _ in 0..suffix_len {
            let idx = self.inner.gen_range(0..ID_CHARSET.len());
            id.push(ID_CHARSET[idx] as char);
        }
        id
    }

    /// Hex string of `len` nibbles drawn from random bytes
    pub fn hex_token(&mut self, len: usize) -> String {
        let mut bytes = vec![0u8; len.div_ceil(2)];
        self.inner.fill(bytes.as_mut_slice());
        let mut s = hex::encode(bytes);
        s.truncate(len);
        s
    }
}
