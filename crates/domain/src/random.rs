//! Injected randomness.
//!
//! The domain never draws random numbers itself. Stochastic rules (NPC
//! evolution, autonomous-action triggers) take a [`RandomSource`] so the
//! engine can plug in a real RNG while tests supply a scripted one.

/// Source of uniform randomness.
pub trait RandomSource: Send + Sync {
    /// Uniform draw in `[0.0, 1.0)`.
    fn roll(&self) -> f64;

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn pick(&self, len: usize) -> usize;
}

/// Scripted random source for tests: returns queued rolls in order and a
/// fixed pick index. Rolls past the end of the script return 1.0 (so no
/// probability check fires accidentally).
#[derive(Debug)]
pub struct ScriptedRandom {
    rolls: std::sync::Mutex<std::collections::VecDeque<f64>>,
    pick_index: usize,
}

impl ScriptedRandom {
    pub fn new(rolls: impl IntoIterator<Item = f64>, pick_index: usize) -> Self {
        Self {
            rolls: std::sync::Mutex::new(rolls.into_iter().collect()),
            pick_index,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn roll(&self) -> f64 {
        self.rolls
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or(1.0)
    }

    fn pick(&self, len: usize) -> usize {
        self.pick_index.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_rolls_in_order_then_one() {
        let rng = ScriptedRandom::new([0.05, 0.5], 0);
        assert_eq!(rng.roll(), 0.05);
        assert_eq!(rng.roll(), 0.5);
        assert_eq!(rng.roll(), 1.0);
    }

    #[test]
    fn pick_is_clamped_to_len() {
        let rng = ScriptedRandom::new([], 10);
        assert_eq!(rng.pick(3), 2);
    }
}
