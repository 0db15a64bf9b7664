//! Random effect handlers
//!
//! One generator per process, seeded once. The seed is kept so a run can be
//! replayed with `SeededRandomHandler::with_seed`.

use parking_lot::Mutex;
use pyggpot_core::RandomEffects;
use rand::Rng;
use rand_chacha::{rand_core::SeedableRng, ChaCha20Rng};
use std::time::{SystemTime, UNIX_EPOCH};

/// ChaCha20-backed randomness handler.
#[derive(Debug)]
pub struct SeededRandomHandler {
    seed: u64,
    rng: Mutex<ChaCha20Rng>,
}

impl SeededRandomHandler {
    /// Reproducible generator for a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    /// Generator seeded from the wall clock.
    pub fn from_time() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        // truncated to the low 64 bits
        Self::with_seed(nanos as u64)
    }

    /// Seed this generator was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for SeededRandomHandler {
    fn default() -> Self {
        Self::from_time()
    }
}

impl RandomEffects for SeededRandomHandler {
    fn uniform_below(&self, bound: u64) -> u64 {
        self.rng.lock().gen_range(0..bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let a = SeededRandomHandler::with_seed(7);
        let b = SeededRandomHandler::with_seed(7);

        let left: Vec<u64> = (0..32).map(|_| a.uniform_below(1_000)).collect();
        let right: Vec<u64> = (0..32).map(|_| b.uniform_below(1_000)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn draws_stay_below_bound() {
        let random = SeededRandomHandler::with_seed(11);
        for bound in [1, 2, 3, 10, 1_000_000] {
            for _ in 0..100 {
                assert!(random.uniform_below(bound) < bound);
            }
        }
    }

    #[test]
    fn remembers_its_seed() {
        assert_eq!(SeededRandomHandler::with_seed(99).seed(), 99);
    }
}
