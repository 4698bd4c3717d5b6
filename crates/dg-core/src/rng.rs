//! Random number generation for dungeon layouts and seed streams
//!
//! Uses a seeded ChaCha RNG so a layout is reproducible from its seed.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded random stream
///
/// Wraps ChaCha8Rng. Two streams built from the same seed yield the same
/// sequence, which is what makes a generated layout replayable.
#[derive(Debug, Clone)]
pub struct GenRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GenRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw a fresh 64-bit seed from the stream
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Returns 0..n-1
    ///
    /// Returns 0 if n is 0.
    pub fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Returns a value in `min..=max`; `min` when the range is empty
    pub fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// Shuffle a slice in place
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.rn2(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rn2_bounds() {
        let mut rng = GenRng::new(42);
        for _ in 0..1000 {
            let n = rng.rn2(10);
            assert!(n < 10);
        }
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let mut rng = GenRng::new(42);
        for _ in 0..1000 {
            let n = rng.range_inclusive(3, 6);
            assert!((3..=6).contains(&n));
        }
        assert_eq!(rng.range_inclusive(5, 5), 5);
        assert_eq!(rng.range_inclusive(7, 2), 7);
    }

    #[test]
    fn test_reproducibility() {
        let mut rng1 = GenRng::new(42);
        let mut rng2 = GenRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.rn2(100), rng2.rn2(100));
            assert_eq!(rng1.next_seed(), rng2.next_seed());
        }
    }

    #[test]
    fn test_zero_inputs() {
        let mut rng = GenRng::new(42);
        assert_eq!(rng.rn2(0), 0);
        assert_eq!(rng.seed(), 42);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GenRng::new(7);
        let mut items = vec![1, 2, 3, 4, 5, 6];
        rng.shuffle(&mut items);
        items.sort();
        assert_eq!(items, vec![1, 2, 3, 4, 5, 6]);
    }
}
