//! Ring topology: construction, neighbor queries and the single-writer handle.
//!
//! Unit `k` reads unit `k - 1`. Unit 0 is the ring-closing unit and reads
//! unit `N - 1`, which turns the chain into a single directed cycle.

use std::sync::Arc;

use crate::error::{Result, TopologyError};
use crate::snapshot::{RingSnapshot, UnitState};
use crate::unit::{ProcessUnit, Rule, UnitId};
use crate::{MAX_UNITS, MIN_UNITS};

/// A fully linked ring of process units.
#[derive(Debug)]
pub struct Ring {
    units: Box<[ProcessUnit]>,
}

impl Ring {
    /// Create the units without linking any neighbors.
    fn unlinked(values: &[usize]) -> Self {
        let states = values.len();
        let units = values
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                let rule = if index == UnitId::RING_CLOSING.index() {
                    Rule::RingClosing { states }
                } else {
                    Rule::Regular
                };
                ProcessUnit::new(UnitId(index), rule, value)
            })
            .collect();

        Self { units }
    }

    /// Link every regular unit to its predecessor.
    fn link_chain(&self) {
        for pair in self.units.windows(2) {
            pair[1].link(pair[0].id());
        }
    }

    /// Link the ring-closing unit to the last unit, closing the cycle.
    fn close(&self) {
        if let (Some(first), Some(last)) = (self.units.first(), self.units.last()) {
            first.link(last.id());
        }
    }

    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Always false for a built ring.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Number of distinct values a unit can hold (K = N).
    pub fn states(&self) -> usize {
        self.units.len()
    }

    /// Get a unit by id.
    pub fn unit(&self, id: UnitId) -> Option<&ProcessUnit> {
        self.units.get(id.index())
    }

    /// All units in id order.
    pub fn units(&self) -> impl Iterator<Item = &ProcessUnit> {
        self.units.iter()
    }

    /// Current value of a unit.
    pub fn value(&self, id: UnitId) -> Option<usize> {
        self.unit(id).map(ProcessUnit::value)
    }

    /// Current values of all units, read one at a time in id order.
    pub fn values(&self) -> Vec<usize> {
        self.units.iter().map(ProcessUnit::value).collect()
    }

    fn neighbor_value(&self, unit: &ProcessUnit) -> Option<usize> {
        unit.neighbor().and_then(|neighbor| self.value(neighbor))
    }

    /// Whether a unit currently holds a privilege.
    pub fn is_privileged(&self, id: UnitId) -> bool {
        self.unit(id).is_some_and(|unit| {
            unit.rule()
                .is_privileged(unit.value(), self.neighbor_value(unit))
        })
    }

    /// Ids of all currently privileged units.
    pub fn privileged(&self) -> Vec<UnitId> {
        self.units
            .iter()
            .map(ProcessUnit::id)
            .filter(|&id| self.is_privileged(id))
            .collect()
    }

    /// Number of currently privileged units.
    pub fn privileged_count(&self) -> usize {
        self.privileged().len()
    }

    /// The unit `id` reads from.
    pub fn predecessor(&self, id: UnitId) -> Option<UnitId> {
        self.unit(id).and_then(ProcessUnit::neighbor)
    }

    /// The unit that reads from `id`.
    pub fn successor(&self, id: UnitId) -> Option<UnitId> {
        self.units
            .iter()
            .find(|unit| unit.neighbor() == Some(id))
            .map(ProcessUnit::id)
    }

    /// Follow neighbor references starting at `from` (yielded first).
    ///
    /// The walk is endless on a linked ring; bound it with `take`.
    pub fn walk(&self, from: UnitId) -> Walk<'_> {
        Walk {
            ring: self,
            next: self.unit(from).map(ProcessUnit::id),
        }
    }

    /// Copy the ring state.
    ///
    /// Values are read once per unit and privileges are derived from the
    /// copy, so the snapshot is self-consistent even if other units move
    /// while it is taken.
    pub fn snapshot(&self, sequence: u64, acted: Option<UnitId>) -> RingSnapshot {
        let values = self.values();
        let units = self
            .units
            .iter()
            .zip(&values)
            .map(|(unit, &value)| {
                let neighbor = unit
                    .neighbor()
                    .and_then(|neighbor| values.get(neighbor.index()).copied());
                UnitState {
                    id: unit.id(),
                    value,
                    privileged: unit.rule().is_privileged(value, neighbor),
                    ring_closing: unit.is_ring_closing(),
                }
            })
            .collect();

        RingSnapshot {
            sequence,
            acted,
            units,
        }
    }
}

/// Iterator over a chain of neighbor references.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    ring: &'a Ring,
    next: Option<UnitId>,
}

impl Iterator for Walk<'_> {
    type Item = UnitId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.ring.predecessor(current);
        Some(current)
    }
}

/// Exclusive write handle for one unit.
///
/// The builder creates exactly one actor per unit and actors cannot be
/// cloned, so a unit's value only changes in whichever context owns its actor.
#[derive(Debug)]
pub struct Actor {
    ring: Arc<Ring>,
    id: UnitId,
}

impl Actor {
    /// The unit this actor drives.
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// The ring this actor belongs to.
    pub fn ring(&self) -> &Arc<Ring> {
        &self.ring
    }

    /// Current value of the driven unit.
    pub fn value(&self) -> usize {
        self.unit().value()
    }

    /// Whether the driven unit currently holds a privilege.
    pub fn is_privileged(&self) -> bool {
        self.ring.is_privileged(self.id)
    }

    fn unit(&self) -> &ProcessUnit {
        // Actors are only created by the builder, for ids inside the ring.
        &self.ring.units[self.id.index()]
    }

    /// Apply the unit's rule once.
    ///
    /// Returns true if the unit was privileged and moved. Calling it again on
    /// a unit that is no longer privileged has no effect.
    pub fn try_act(&mut self) -> bool {
        let unit = self.unit();
        let neighbor = self.ring.neighbor_value(unit);
        match unit.rule().next_value(unit.value(), neighbor) {
            Some(next) => {
                unit.store(next);
                true
            }
            None => false,
        }
    }
}

/// Builds a ring and hands out its actors.
#[derive(Debug, Clone)]
pub struct RingBuilder {
    count: usize,
    values: Option<Vec<usize>>,
}

impl RingBuilder {
    /// A ring of `count` units where every unit starts privileged.
    ///
    /// The initial values are only laid out by [`build`](Self::build), once
    /// `count` is known to be in range.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            values: None,
        }
    }

    /// A ring with explicit initial values, one per unit in id order.
    pub fn with_values(values: Vec<usize>) -> Self {
        Self {
            count: values.len(),
            values: Some(values),
        }
    }

    /// The worst-case start: unit k holds k, except the last unit holds 0.
    ///
    /// Unit 0 then equals its neighbor and every regular unit differs from its
    /// neighbor, so all N units are privileged.
    pub fn initial_values(count: usize) -> Vec<usize> {
        (0..count)
            .map(|k| if k + 1 == count { 0 } else { k })
            .collect()
    }

    /// Validate, create and link the ring.
    pub fn build(self) -> Result<(Arc<Ring>, Vec<Actor>)> {
        let count = self.count;
        if count < MIN_UNITS {
            return Err(TopologyError::TooFewUnits {
                count,
                min: MIN_UNITS,
            });
        }
        if count > MAX_UNITS {
            return Err(TopologyError::TooManyUnits {
                count,
                max: MAX_UNITS,
            });
        }

        let values = self
            .values
            .unwrap_or_else(|| Self::initial_values(count));
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, &value)| value >= count)
        {
            return Err(TopologyError::ValueOutOfRange {
                id: UnitId(index),
                value,
                states: count,
            });
        }

        let ring = Ring::unlinked(&values);
        ring.link_chain();
        ring.close();

        let ring = Arc::new(ring);
        let actors = (0..count)
            .map(|index| Actor {
                ring: Arc::clone(&ring),
                id: UnitId(index),
            })
            .collect();

        Ok((ring, actors))
    }
}
