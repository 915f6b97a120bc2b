//! Injectable uniform randomness.
//!
//! Round generation and phrase selection only ever ask for "an index below
//! `len`", so the controller is generic over this small trait. The browser
//! build plugs in an entropy-seeded [`StdRng`]; tests plug in a seeded rng or
//! a scripted sequence to assert exact permutations and targets.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniformly distributed indices.
pub trait RandomSource {
    /// Returns an index uniformly distributed in `0..len`. `len` is never 0.
    fn index_below(&mut self, len: usize) -> usize;
}

impl RandomSource for StdRng {
    fn index_below(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn index_below(&mut self, len: usize) -> usize {
        (**self).index_below(len)
    }
}

/// Entropy-seeded generator (backed by `getrandom`, which reads
/// `crypto.getRandomValues` in the browser).
pub fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Replays a fixed list of raw draws, each reduced modulo the requested
/// length. Wraps around when exhausted.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    draws: Vec<usize>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(draws: impl Into<Vec<usize>>) -> Self {
        Self {
            draws: draws.into(),
            cursor: 0,
        }
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn index_below(&mut self, len: usize) -> usize {
        if self.draws.is_empty() {
            return 0;
        }
        let raw = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        raw % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_reduces_modulo_and_wraps() {
        let mut r = ScriptedRandom::new(vec![3, 25]);
        assert_eq!(r.index_below(2), 1);
        assert_eq!(r.index_below(20), 5);
        assert_eq!(r.index_below(10), 3);
        assert_eq!(r.consumed(), 3);
    }

    #[test]
    fn empty_script_always_returns_zero() {
        let mut r = ScriptedRandom::default();
        assert_eq!(r.index_below(7), 0);
    }

    #[test]
    fn std_rng_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for len in 1..30 {
            assert!(rng.index_below(len) < len);
        }
    }
}
