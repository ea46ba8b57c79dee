//! Exponentially distributed think times.
//!
//! Sampled by inverting the CDF of a uniform draw: `t = -mean * ln(1 - u)`
//! with `u` in `[0, 1)`, so `t` is finite and non-negative.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stabring_core::UnitId;

/// Spreads per-unit seeds apart so neighboring ids get unrelated streams.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Delay generator for one execution loop.
#[derive(Debug, Clone)]
pub struct ExponentialDelay {
    rng: StdRng,
    mean: f64,
    unit: Duration,
}

impl ExponentialDelay {
    /// Generator seeded from OS entropy.
    pub fn new(mean: f64, unit: Duration) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            mean,
            unit,
        }
    }

    /// Deterministic generator.
    pub fn seeded(mean: f64, unit: Duration, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            mean,
            unit,
        }
    }

    /// Generator for one unit, independent from every other unit's.
    pub fn for_unit(mean: f64, unit: Duration, seed: Option<u64>, id: UnitId) -> Self {
        match seed {
            Some(seed) => {
                let seed = seed.wrapping_add((id.index() as u64).wrapping_mul(SEED_STRIDE));
                Self::seeded(mean, unit, seed)
            }
            None => Self::new(mean, unit),
        }
    }

    /// Mean delay in time units.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Next delay, in time units.
    pub fn sample(&mut self) -> f64 {
        let u: f64 = self.rng.gen();
        -self.mean * (1.0 - u).ln()
    }

    /// Next delay as a wall-clock duration.
    pub fn next_delay(&mut self) -> Duration {
        let seconds = self.unit.as_secs_f64() * self.sample();
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sample_mean_is_close_to_configured_mean() {
        let mut delay = ExponentialDelay::seeded(5.0, Duration::from_secs(1), 42);
        let samples = 20_000;
        let total: f64 = (0..samples).map(|_| delay.sample()).sum();
        let mean = total / samples as f64;
        assert!((4.7..5.3).contains(&mean), "sample mean {} too far from 5", mean);
    }

    #[test]
    fn same_seed_same_delays() {
        let mut a = ExponentialDelay::seeded(5.0, Duration::from_millis(10), 7);
        let mut b = ExponentialDelay::seeded(5.0, Duration::from_millis(10), 7);
        for _ in 0..100 {
            assert_eq!(a.next_delay(), b.next_delay());
        }
    }

    #[test]
    fn units_get_distinct_streams() {
        let unit = Duration::from_millis(1);
        let mut a = ExponentialDelay::for_unit(5.0, unit, Some(1), UnitId(0));
        let mut b = ExponentialDelay::for_unit(5.0, unit, Some(1), UnitId(1));
        let a: Vec<_> = (0..8).map(|_| a.next_delay()).collect();
        let b: Vec<_> = (0..8).map(|_| b.next_delay()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn every_unit_keeps_the_configured_mean() {
        for id in 0..4 {
            let delay = ExponentialDelay::for_unit(2.5, Duration::from_millis(1), None, UnitId(id));
            assert_eq!(delay.mean(), 2.5);
        }
    }

    #[test]
    fn delay_scales_with_time_unit() {
        let mut seconds = ExponentialDelay::seeded(5.0, Duration::from_secs(1), 3);
        let mut millis = ExponentialDelay::seeded(5.0, Duration::from_millis(1), 3);
        for _ in 0..50 {
            let s = seconds.next_delay().as_secs_f64();
            let m = millis.next_delay().as_secs_f64();
            assert!((s / 1000.0 - m).abs() < 1e-6);
        }
    }

    proptest! {
        #[test]
        fn delays_are_non_negative(seed in any::<u64>(), mean in 0.001f64..100.0) {
            let mut delay = ExponentialDelay::seeded(mean, Duration::from_millis(1), seed);
            for _ in 0..32 {
                let t = delay.sample();
                prop_assert!(t.is_finite());
                prop_assert!(t >= 0.0);
            }
        }
    }
}
