//! Scripted randomness for reproducible tests
//!
//! Uses `parking_lot::Mutex` so the handler satisfies the `&self` contract of
//! `RandomEffects` like the production handler does.

use parking_lot::Mutex;
use pyggpot_core::RandomEffects;

/// Replays a fixed list of draws, cycling when it runs out.
///
/// Each scripted value is reduced modulo the requested bound, so any script
/// yields in-range draws. An empty script always draws `0`.
#[derive(Debug)]
pub struct ScriptedRandom {
    script: Vec<u64>,
    position: Mutex<usize>,
}

impl ScriptedRandom {
    /// Create a handler replaying `script`.
    pub fn new(script: impl IntoIterator<Item = u64>) -> Self {
        Self {
            script: script.into_iter().collect(),
            position: Mutex::new(0),
        }
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        *self.position.lock()
    }
}

impl RandomEffects for ScriptedRandom {
    fn uniform_below(&self, bound: u64) -> u64 {
        let mut position = self.position.lock();
        let value = if self.script.is_empty() {
            0
        } else {
            self.script[*position % self.script.len()]
        };
        *position += 1;
        value % bound
    }
}
