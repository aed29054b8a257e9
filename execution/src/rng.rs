//! Seeded randomness for the table.
//!
//! Every random choice the table makes (target draws, bounce paths, hop timing)
//! flows through [`TableRng`], so a table built from a seed replays identically.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// ChaCha20-backed generator with the helpers the table needs.
#[derive(Clone, Debug)]
pub struct TableRng {
    inner: ChaCha20Rng,
}

impl TableRng {
    /// Create a generator that always yields the same sequence for `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Create a generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha20Rng::from_entropy(),
        }
    }

    /// Derive an independent generator, advancing this one.
    pub fn fork(&mut self) -> Self {
        Self::seeded(self.inner.next_u64())
    }

    /// Uniform pocket number in `[0, slot_count)`.
    pub fn pocket(&mut self, slot_count: u8) -> u8 {
        if slot_count == 0 {
            return 0;
        }
        self.inner.gen_range(0..slot_count)
    }

    /// Uniform value in `[low, high)`; `low` when the range is empty.
    pub fn range_f32(&mut self, low: f32, high: f32) -> f32 {
        if high <= low {
            return low;
        }
        self.inner.gen_range(low..high)
    }

    /// Uniform value in `[low, high]`; `low` when the range is empty.
    pub fn range_inclusive(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        self.inner.gen_range(low..=high)
    }

    /// Remove and return a uniformly chosen element (draw without replacement).
    pub fn draw<T>(&mut self, pool: &mut Vec<T>) -> Option<T> {
        if pool.is_empty() {
            return None;
        }
        let idx = self.inner.gen_range(0..pool.len());
        Some(pool.swap_remove(idx))
    }
}

impl RngCore for TableRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
