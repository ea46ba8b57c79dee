//! Process units and their transition rules.
//!
//! A unit owns an id, an atomic value and a link to its predecessor. The rule
//! it follows is chosen once at construction and never changes.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Position of a unit in the ring, `0..N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UnitId(pub usize);

impl UnitId {
    /// The distinguished unit whose rule closes the ring.
    pub const RING_CLOSING: Self = Self(0);

    /// Create a unit id.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two transition rules of the K-state algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "rule", rename_all = "snake_case"))]
pub enum Rule {
    /// Privileged when differing from the neighbor; acts by copying it.
    Regular,
    /// Privileged when equal to the neighbor; acts by counting up modulo `states`.
    RingClosing {
        /// Number of distinct values (K). Always the ring size here.
        states: usize,
    },
}

impl Rule {
    /// Whether a unit holding `own` is privileged given its neighbor's value.
    ///
    /// An unset neighbor (`None`) is never privileged. This only happens to the
    /// ring-closing unit while the ring is being assembled.
    pub fn is_privileged(&self, own: usize, neighbor: Option<usize>) -> bool {
        match (self, neighbor) {
            (Rule::Regular, Some(neighbor)) => own != neighbor,
            (Rule::RingClosing { .. }, Some(neighbor)) => own == neighbor,
            (_, None) => false,
        }
    }

    /// The value a privileged unit moves to, or `None` if it is not privileged.
    ///
    /// # Examples
    ///
    /// ```
    /// use stabring_core::Rule;
    ///
    /// assert_eq!(Rule::Regular.next_value(3, Some(5)), Some(5));
    /// assert_eq!(Rule::Regular.next_value(5, Some(5)), None);
    /// assert_eq!(Rule::RingClosing { states: 5 }.next_value(4, Some(4)), Some(0));
    /// ```
    pub fn next_value(&self, own: usize, neighbor: Option<usize>) -> Option<usize> {
        if !self.is_privileged(own, neighbor) {
            return None;
        }
        match *self {
            Rule::Regular => neighbor,
            Rule::RingClosing { states } => Some((own + 1) % states),
        }
    }
}

/// One unit of the ring.
#[derive(Debug)]
pub struct ProcessUnit {
    id: UnitId,
    rule: Rule,
    value: AtomicUsize,
    neighbor: OnceLock<UnitId>,
}

impl ProcessUnit {
    pub(crate) fn new(id: UnitId, rule: Rule, value: usize) -> Self {
        Self {
            id,
            rule,
            value: AtomicUsize::new(value),
            neighbor: OnceLock::new(),
        }
    }

    /// This unit's id.
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// The rule this unit follows.
    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// Whether this is the ring-closing unit.
    pub fn is_ring_closing(&self) -> bool {
        matches!(self.rule, Rule::RingClosing { .. })
    }

    /// Current value. Safe to call from any thread.
    pub fn value(&self) -> usize {
        self.value.load(Ordering::Acquire)
    }

    /// The predecessor this unit reads, once linked.
    pub fn neighbor(&self) -> Option<UnitId> {
        self.neighbor.get().copied()
    }

    /// Link the predecessor. Returns false if already linked.
    pub(crate) fn link(&self, neighbor: UnitId) -> bool {
        self.neighbor.set(neighbor).is_ok()
    }

    pub(crate) fn store(&self, value: usize) {
        self.value.store(value, Ordering::Release);
    }
}
