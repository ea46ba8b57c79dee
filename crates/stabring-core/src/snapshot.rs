//! Point-in-time copies of the ring.

use crate::unit::UnitId;

/// State of one unit inside a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitState {
    pub id: UnitId,
    pub value: usize,
    pub privileged: bool,
    pub ring_closing: bool,
}

/// A copy of every unit's state, in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RingSnapshot {
    /// 0 for the initial snapshot, then the notification count
    pub sequence: u64,
    /// The unit whose notification triggered this snapshot
    pub acted: Option<UnitId>,
    pub units: Vec<UnitState>,
}

impl RingSnapshot {
    /// Number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// True if the snapshot holds no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Ids of the privileged units.
    pub fn privileged(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.iter().filter(|u| u.privileged).map(|u| u.id)
    }

    /// Number of privileged units.
    pub fn privileged_count(&self) -> usize {
        self.privileged().count()
    }

    /// The token holder, if exactly one unit is privileged.
    pub fn holder(&self) -> Option<UnitId> {
        let mut privileged = self.privileged();
        match (privileged.next(), privileged.next()) {
            (Some(holder), None) => Some(holder),
            _ => None,
        }
    }

    /// Whether `id` triggered this snapshot.
    pub fn is_acted(&self, id: UnitId) -> bool {
        self.acted == Some(id)
    }
}
