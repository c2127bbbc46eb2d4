//! Clock and random implementations.

use chrono::{DateTime, Utc};

use crate::infrastructure::ports::ClockPort;
use fableforge_domain::RandomSource;

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// System random - uses real randomness.
pub struct SystemRandom;

impl SystemRandom {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandom {
    fn roll(&self) -> f64 {
        use rand::Rng;
        rand::thread_rng().gen_range(0.0..1.0)
    }

    fn pick(&self, len: usize) -> usize {
        use rand::Rng;
        rand::thread_rng().gen_range(0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_random_roll_is_in_unit_interval() {
        let random = SystemRandom::new();
        for _ in 0..100 {
            let roll = random.roll();
            assert!((0.0..1.0).contains(&roll));
        }
    }

    #[test]
    fn system_random_pick_is_in_bounds() {
        let random = SystemRandom::new();
        for _ in 0..100 {
            assert!(random.pick(3) < 3);
        }
    }
}
