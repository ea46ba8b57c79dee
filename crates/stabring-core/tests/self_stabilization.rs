//! Property tests for self-stabilization from arbitrary starting values.

use proptest::prelude::*;
use stabring_core::{RingBuilder, Stepper, UnitId, MIN_UNITS};

/// Ring sizes small enough to run many cases quickly.
const LARGEST_RING: usize = 7;

/// Arbitrary initial values, each in `0..N`.
fn arb_values() -> impl Strategy<Value = Vec<usize>> {
    (MIN_UNITS..=LARGEST_RING).prop_flat_map(|n| prop::collection::vec(0..n, n))
}

/// Generous move budget for stabilizing N units from any configuration.
fn budget(n: usize) -> usize {
    2 * n * n
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every configuration has at least one privileged unit.
    #[test]
    fn never_deadlocked(values in arb_values()) {
        let (ring, _actors) = RingBuilder::with_values(values).build().unwrap();
        prop_assert!(ring.privileged_count() >= 1);
    }

    /// Any schedule reaches a single privilege within the budget.
    #[test]
    fn stabilizes_from_any_configuration(values in arb_values(), seed in any::<u64>()) {
        let n = values.len();
        let (ring, actors) = RingBuilder::with_values(values).build().unwrap();
        let mut stepper = Stepper::new(ring, actors, seed).unwrap();

        let taken = stepper.run_until_stable(budget(n));
        prop_assert!(taken.is_some(), "did not stabilize within {} moves", budget(n));
    }

    /// Once a single privilege exists it is never duplicated or lost.
    #[test]
    fn token_is_conserved(values in arb_values(), seed in any::<u64>(), extra in 1usize..64) {
        let n = values.len();
        let (ring, actors) = RingBuilder::with_values(values).build().unwrap();
        let mut stepper = Stepper::new(ring, actors, seed).unwrap();
        stepper.run_until_stable(budget(n)).unwrap();

        for _ in 0..extra {
            let moved = stepper.step();
            prop_assert!(moved.is_some());
            prop_assert_eq!(stepper.ring().privileged_count(), 1);
        }
    }

    /// A move is recorded only when the rule fired.
    #[test]
    fn notifications_match_moves(values in arb_values(), picks in prop::collection::vec(0usize..LARGEST_RING, 1..64)) {
        let n = values.len();
        let (ring, actors) = RingBuilder::with_values(values).build().unwrap();
        let mut stepper = Stepper::new(ring, actors, 0).unwrap();

        let mut moved = Vec::new();
        for pick in picks {
            let id = UnitId(pick % n);
            let was_privileged = stepper.ring().is_privileged(id);
            let acted = stepper.step_unit(id).unwrap();
            prop_assert_eq!(acted, was_privileged);
            if acted {
                moved.push(id);
            }
        }
        prop_assert_eq!(stepper.notifications(), moved.as_slice());
    }

    /// Values written by the rules stay inside `0..N`.
    #[test]
    fn values_stay_in_range(values in arb_values(), seed in any::<u64>()) {
        let n = values.len();
        let (ring, actors) = RingBuilder::with_values(values).build().unwrap();
        let mut stepper = Stepper::new(ring, actors, seed).unwrap();

        for _ in 0..(4 * n) {
            stepper.step();
            prop_assert!(stepper.ring().values().iter().all(|&v| v < n));
        }
    }
}
