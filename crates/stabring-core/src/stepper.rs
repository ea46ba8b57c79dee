//! Single-threaded, one-move-at-a-time driver.
//!
//! The stepper owns every actor of a ring and applies one rule at a time,
//! picking the mover among the currently privileged units with a seeded
//! generator. It records a notification for each successful move, exactly
//! like the concurrent execution loops do, but with no timing involved.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Result, TopologyError};
use crate::ring::{Actor, Ring};
use crate::snapshot::RingSnapshot;
use crate::unit::UnitId;

/// Deterministic scheduler over a ring's actors.
#[derive(Debug)]
pub struct Stepper {
    ring: Arc<Ring>,
    actors: Vec<Actor>,
    rng: StdRng,
    notifications: Vec<UnitId>,
}

impl Stepper {
    /// Take ownership of all actors of `ring`.
    ///
    /// The actors may come in any order, but there must be exactly one per
    /// unit and all of them must have been built with `ring`.
    pub fn new(ring: Arc<Ring>, mut actors: Vec<Actor>, seed: u64) -> Result<Self> {
        if actors.len() != ring.len() {
            return Err(TopologyError::ActorCount {
                expected: ring.len(),
                found: actors.len(),
            });
        }
        if let Some(stray) = actors.iter().find(|actor| !Arc::ptr_eq(actor.ring(), &ring)) {
            return Err(TopologyError::ForeignActor(stray.id()));
        }

        // Index `k` must hold unit `k`; with the length fixed, a duplicate id
        // shows up as a gap.
        actors.sort_by_key(Actor::id);
        if let Some(stray) = actors
            .iter()
            .enumerate()
            .find(|(index, actor)| actor.id().index() != *index)
        {
            return Err(TopologyError::ForeignActor(stray.1.id()));
        }

        Ok(Self {
            ring,
            actors,
            rng: StdRng::seed_from_u64(seed),
            notifications: Vec::new(),
        })
    }

    /// The ring being driven.
    pub fn ring(&self) -> &Arc<Ring> {
        &self.ring
    }

    /// Ids of every unit that moved, in order.
    pub fn notifications(&self) -> &[UnitId] {
        &self.notifications
    }

    /// Number of moves made so far.
    pub fn steps(&self) -> usize {
        self.notifications.len()
    }

    /// Snapshot of the ring after the latest move.
    pub fn snapshot(&self) -> RingSnapshot {
        self.ring
            .snapshot(self.notifications.len() as u64, self.notifications.last().copied())
    }

    /// Apply the rule of one specific unit.
    ///
    /// Records a notification only if the unit moved.
    pub fn step_unit(&mut self, id: UnitId) -> Result<bool> {
        let actor = self
            .actors
            .get_mut(id.index())
            .ok_or(TopologyError::UnknownUnit(id))?;

        let moved = actor.try_act();
        if moved {
            self.notifications.push(id);
        }
        Ok(moved)
    }

    /// Move one privileged unit, chosen at random.
    ///
    /// Returns the unit that moved, or `None` if nothing is privileged.
    pub fn step(&mut self) -> Option<UnitId> {
        let privileged = self.ring.privileged();
        let &id = privileged.choose(&mut self.rng)?;
        match self.step_unit(id) {
            Ok(true) => Some(id),
            _ => None,
        }
    }

    /// Step until exactly one unit is privileged.
    ///
    /// Returns the number of moves taken, or `None` if `max_steps` ran out.
    pub fn run_until_stable(&mut self, max_steps: usize) -> Option<usize> {
        let start = self.steps();
        loop {
            if self.ring.privileged_count() == 1 {
                return Some(self.steps() - start);
            }
            if self.steps() - start >= max_steps {
                return None;
            }
            self.step()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::RingBuilder;

    fn stepper(count: usize, seed: u64) -> Stepper {
        let (ring, actors) = RingBuilder::new(count).build().unwrap();
        Stepper::new(ring, actors, seed).unwrap()
    }

    #[test]
    fn five_units_stabilize_and_keep_one_token() {
        for seed in 0..50 {
            let mut stepper = stepper(5, seed);
            let budget = 10 * 5;

            let mut stabilized = false;
            for _ in 0..budget {
                stepper.step().expect("some unit is always privileged");
                let privileged = stepper.ring().privileged_count();
                if stabilized {
                    assert_eq!(privileged, 1, "token duplicated or lost (seed {})", seed);
                }
                stabilized |= privileged == 1;
            }
            assert!(stabilized, "no single privilege within {} steps (seed {})", budget, seed);
        }
    }

    #[test]
    fn notification_per_successful_move() {
        let mut stepper = stepper(5, 7);

        // Unit 2 moves, then has nothing left to do.
        assert!(stepper.step_unit(UnitId(2)).unwrap());
        assert!(!stepper.step_unit(UnitId(2)).unwrap());
        assert_eq!(stepper.notifications(), &[UnitId(2)]);

        for _ in 0..20 {
            stepper.step();
        }
        assert_eq!(stepper.steps(), 21);
    }

    #[test]
    fn unknown_unit_is_an_error() {
        let mut stepper = stepper(3, 0);
        assert_eq!(
            stepper.step_unit(UnitId(3)),
            Err(TopologyError::UnknownUnit(UnitId(3)))
        );
        assert!(stepper.notifications().is_empty());
    }

    #[test]
    fn actor_order_does_not_matter() {
        let (ring, mut actors) = RingBuilder::new(5).build().unwrap();
        actors.reverse();
        let mut stepper = Stepper::new(Arc::clone(&ring), actors, 0).unwrap();

        assert!(stepper.step_unit(UnitId(1)).unwrap());
        assert_eq!(ring.values(), vec![0, 0, 2, 3, 0]);
        assert_eq!(stepper.notifications(), &[UnitId(1)]);
    }

    #[test]
    fn partial_actor_set_rejected() {
        let (ring, mut actors) = RingBuilder::new(4).build().unwrap();
        actors.pop();
        assert_eq!(
            Stepper::new(ring, actors, 0).unwrap_err(),
            TopologyError::ActorCount {
                expected: 4,
                found: 3,
            }
        );
    }

    #[test]
    fn actors_of_another_ring_rejected() {
        let (ring, mut actors) = RingBuilder::new(4).build().unwrap();
        let (_other, mut other_actors) = RingBuilder::new(4).build().unwrap();
        actors[2] = other_actors.remove(2);
        assert_eq!(
            Stepper::new(ring, actors, 0).unwrap_err(),
            TopologyError::ForeignActor(UnitId(2))
        );
    }

    #[test]
    fn token_circulates_through_every_unit() {
        let mut stepper = stepper(6, 11);
        stepper.run_until_stable(200).unwrap();

        let start = stepper.steps();
        for _ in 0..(6 * 3) {
            stepper.step().unwrap();
        }
        let mut movers: Vec<_> = stepper.notifications()[start..].to_vec();
        movers.sort();
        movers.dedup();
        assert_eq!(movers.len(), 6);
    }

    #[test]
    fn same_seed_same_schedule() {
        let mut a = stepper(7, 99);
        let mut b = stepper(7, 99);
        for _ in 0..40 {
            a.step();
            b.step();
        }
        assert_eq!(a.notifications(), b.notifications());
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn snapshot_marks_last_mover() {
        let mut stepper = stepper(4, 3);
        let moved = stepper.step().unwrap();
        let snap = stepper.snapshot();
        assert_eq!(snap.sequence, 1);
        assert_eq!(snap.acted, Some(moved));
    }
}
