//! Seedable randomness for maze generation
//!
//! Every engine draws from a [`RandomSource`], so callers choose the seed (or
//! inject their own source) and a run is reproducible from that seed alone.
//! The default source is a Park-Miller "MINSTD" generator:
//!
//! - Multiplier (a): 48271
//! - Modulus (m): 2^31 - 1 = 2147483647
//!
//! Reference: https://en.wikipedia.org/wiki/Lehmer_random_number_generator

const MULTIPLIER: u64 = 48271;
const MODULUS: u64 = 2147483647; // 2^31 - 1

/// A source of uniformly distributed integers.
///
/// Only [`RandomSource::choice_index`] must be provided; the rest is built on it.
pub trait RandomSource {
    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn choice_index(&mut self, len: usize) -> usize;

    /// Uniform integer in `[a, b]` (inclusive). Requires `a <= b`.
    fn randint(&mut self, a: usize, b: usize) -> usize {
        debug_assert!(a <= b, "randint called with empty range [{a}, {b}]");
        a + self.choice_index(b - a + 1)
    }

    /// Uniform element of a slice, `None` when it is empty
    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.choice_index(items.len())])
        }
    }

    /// Index drawn with probability proportional to `weights[i]`.
    ///
    /// The weights must not all be zero.
    fn weighted_index(&mut self, weights: &[u32]) -> usize {
        let total: u32 = weights.iter().sum();
        let mut ticket = self.choice_index(total as usize) as u32;
        for (i, &w) in weights.iter().enumerate() {
            if ticket < w {
                return i;
            }
            ticket -= w;
        }
        weights.len() - 1
    }
}

/// Park-Miller Linear Congruential Generator
///
/// Same seed always produces the same sequence, on every platform.
#[derive(Clone, Debug)]
pub struct SimpleLCG {
    state: u32,
}

impl SimpleLCG {
    /// Create a new LCG with the given seed
    ///
    /// Seeds are reduced modulo 2^31 - 1; a zero state is replaced with 1
    /// because it would stay zero forever.
    pub fn new(seed: u32) -> Self {
        let state = (seed as u64 % MODULUS) as u32;
        let mut rng = Self {
            state: if state == 0 { 1 } else { state },
        };
        // small seeds produce small first states; step past them
        rng.advance();
        rng.advance();
        rng
    }

    fn advance(&mut self) -> u32 {
        // u64 keeps the product from overflowing
        self.state = ((self.state as u64 * MULTIPLIER) % MODULUS) as u32;
        self.state
    }
}

impl RandomSource for SimpleLCG {
    /// Pure integer scaling of the state into `[0, len)`, no floating point
    fn choice_index(&mut self, len: usize) -> usize {
        let state = self.advance() as u64;
        ((state * len as u64) / MODULUS) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = SimpleLCG::new(12345);
        let mut rng2 = SimpleLCG::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.choice_index(1000), rng2.choice_index(1000));
        }
    }

    #[test]
    fn test_seed_zero_is_usable() {
        let mut rng = SimpleLCG::new(0);
        let draws: Vec<usize> = (0..20).map(|_| rng.choice_index(100)).collect();
        assert!(draws.iter().any(|&d| d != draws[0]), "seed 0 must not be degenerate");
    }

    #[test]
    fn test_seed_equal_to_modulus_is_usable() {
        let mut rng = SimpleLCG::new(2147483647);
        let draws: Vec<usize> = (0..20).map(|_| rng.choice_index(100)).collect();
        assert!(draws.iter().any(|&d| d != draws[0]));
    }

    #[test]
    fn test_randint() {
        let mut rng = SimpleLCG::new(11111);

        for _ in 0..100 {
            let val = rng.randint(5, 10);
            assert!((5..=10).contains(&val), "randint {} not in [5, 10]", val);
        }
    }

    #[test]
    fn test_weighted_index_respects_zero_weight() {
        let mut rng = SimpleLCG::new(777);
        for _ in 0..500 {
            assert_ne!(rng.weighted_index(&[1, 0, 3]), 1);
        }
    }

    #[test]
    fn test_weighted_index_distribution() {
        let mut rng = SimpleLCG::new(2918957128);
        let mut counts = [0usize; 4];
        for _ in 0..6000 {
            counts[rng.weighted_index(&[1, 1, 2, 2])] += 1;
        }
        // Heavier entries come up roughly twice as often
        assert!(counts[2] > counts[0] && counts[3] > counts[1]);
        assert!(counts.iter().all(|&c| c > 500));
    }

    #[test]
    fn test_choose() {
        let mut rng = SimpleLCG::new(3);
        let empty: [u8; 0] = [];
        assert_eq!(rng.choose(&empty), None);
        assert_eq!(rng.choose(&[42]), Some(&42));
    }
}
