//! Seeded pseudo-random stream for question generation.
//!
//! Every randomized choice in the generator flows through a single
//! [`SeededRng`] threaded through the pattern families in manifest order.
//! The same seed and the same call sequence always yield the same corpus.

use rand::{RngCore, SeedableRng};

use crate::error::GenerationError;

const INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Mulberry32 generator over a 32-bit state.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(INCREMENT);
        let s = self.state;
        let mut t = (s ^ (s >> 15)).wrapping_mul(1 | s);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        t ^ (t >> 14)
    }

    /// Next float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_raw()) / TWO_POW_32
    }

    /// Uniform index in `[0, n)`, computed as `floor(next() * n)`.
    ///
    /// Returns 0 without consuming the stream when `n` is 0.
    pub fn pick_index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        (self.next_f64() * n as f64).floor() as usize
    }

    /// Uniformly pick one element of `items`.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Result<T, GenerationError> {
        if items.is_empty() {
            return Err(GenerationError::EmptyChoice);
        }
        Ok(items[self.pick_index(items.len())])
    }

    /// Return a Fisher–Yates permuted copy of `items`.
    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut out = items.to_vec();
        for i in (1..out.len()).rev() {
            let j = self.pick_index(i + 1);
            out.swap(i, j);
        }
        out
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let low = u64::from(self.next_raw());
        let high = u64::from(self.next_raw());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_stream() {
        let mut rng = SeededRng::new(99_721);
        assert_eq!(rng.next_u32(), 3_312_781_013);
        assert_eq!(rng.next_u32(), 4_086_726_356);
        assert_eq!(rng.next_u32(), 675_677_216);

        let mut rng = SeededRng::new(42);
        assert_eq!(rng.next_u32(), 2_581_720_956);
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeededRng::new(7);
        let mut b = SeededRng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn floats_stay_in_unit_interval() {
        let mut rng = SeededRng::new(1);
        for _ in 0..10_000 {
            let x = rng.next_f64();
            assert!((0.0..1.0).contains(&x), "out of range: {x}");
        }
    }

    #[test]
    fn pick_index_in_range() {
        let mut rng = SeededRng::new(3);
        for n in 1..20 {
            for _ in 0..50 {
                assert!(rng.pick_index(n) < n);
            }
        }
    }

    #[test]
    fn pick_from_empty_fails() {
        let mut rng = SeededRng::new(3);
        let empty: [u8; 0] = [];
        assert!(matches!(rng.pick(&empty), Err(GenerationError::EmptyChoice)));
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = SeededRng::new(11);
        let items = [1, 2, 3, 4, 5, 6, 7, 8];
        let mut shuffled = rng.shuffle(&items);
        assert_eq!(shuffled.len(), items.len());
        shuffled.sort_unstable();
        assert_eq!(shuffled, items);
    }

    #[test]
    fn from_seed_matches_new() {
        let mut a = SeededRng::from_seed(42u32.to_le_bytes());
        let mut b = SeededRng::new(42);
        assert_eq!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn drives_rand_apis() {
        use rand::Rng;

        let mut rng = SeededRng::new(99_721);
        let mut bytes = [0u8; 6];
        rng.fill_bytes(&mut bytes);
        assert_eq!(bytes[..4], 3_312_781_013u32.to_le_bytes());

        let roll: u8 = rng.gen_range(1..=6);
        assert!((1..=6).contains(&roll));
    }
}
