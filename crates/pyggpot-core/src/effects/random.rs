//! Randomness effect interface

use std::sync::Arc;

/// Source of uniformly distributed integers.
///
/// Handlers use interior mutability so one generator can be shared by
/// reference across every operation in a process.
pub trait RandomEffects {
    /// Uniform integer in `[0, bound)`.
    ///
    /// Callers never pass `bound == 0`.
    fn uniform_below(&self, bound: u64) -> u64;
}

impl<R: RandomEffects + ?Sized> RandomEffects for &R {
    fn uniform_below(&self, bound: u64) -> u64 {
        (**self).uniform_below(bound)
    }
}

impl<R: RandomEffects + ?Sized> RandomEffects for Arc<R> {
    fn uniform_below(&self, bound: u64) -> u64 {
        (**self).uniform_below(bound)
    }
}
