//! Convergence tracking over a stream of snapshots.
//!
//! The ring is stabilized once exactly one unit is privileged. After that the
//! privilege count must stay at one; anything else is recorded as a
//! violation. Snapshots taken while other units keep moving may be stale, so
//! an observer can see violations the ring itself never had.

use crate::snapshot::RingSnapshot;

/// What a single snapshot told the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// More than one unit still privileged
    Converging { privileged: usize },
    /// First snapshot with a single privilege
    Stabilized,
    /// Still exactly one privilege
    Stable,
    /// Privilege count left one after stabilizing
    Violation { privileged: usize },
}

/// Tracks how a ring converges.
#[derive(Debug, Clone, Default)]
pub struct Convergence {
    observed: u64,
    stabilized_at: Option<u64>,
    violations: u64,
    last_privileged: usize,
}

impl Convergence {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next snapshot.
    pub fn observe(&mut self, snapshot: &RingSnapshot) -> Observation {
        let privileged = snapshot.privileged_count();
        self.observed += 1;
        self.last_privileged = privileged;

        match (self.stabilized_at, privileged) {
            (None, 1) => {
                self.stabilized_at = Some(snapshot.sequence);
                Observation::Stabilized
            }
            (None, privileged) => Observation::Converging { privileged },
            (Some(_), 1) => Observation::Stable,
            (Some(_), privileged) => {
                self.violations += 1;
                Observation::Violation { privileged }
            }
        }
    }

    /// Sequence number of the first single-privilege snapshot.
    pub fn stabilized_at(&self) -> Option<u64> {
        self.stabilized_at
    }

    /// Stabilized with no violation since.
    pub fn is_stabilized(&self) -> bool {
        self.stabilized_at.is_some() && self.violations == 0
    }

    /// Snapshots seen after stabilizing with a privilege count other than one.
    pub fn violations(&self) -> u64 {
        self.violations
    }

    /// Number of snapshots observed.
    pub fn observed(&self) -> u64 {
        self.observed
    }

    /// Privilege count of the latest snapshot.
    pub fn last_privileged(&self) -> usize {
        self.last_privileged
    }
}
