//! Error types for stabring-core.

use thiserror::Error;

use crate::unit::UnitId;

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Errors raised while assembling a ring.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// Fewer units than the algorithm needs.
    #[error("a ring needs at least {min} units, got {count}")]
    TooFewUnits { count: usize, min: usize },

    /// More units than a ring may hold.
    #[error("a ring holds at most {max} units, got {count}")]
    TooManyUnits { count: usize, max: usize },

    /// An initial value outside `0..states`.
    #[error("unit {id} starts at {value}, outside 0..{states}")]
    ValueOutOfRange {
        id: UnitId,
        value: usize,
        states: usize,
    },

    /// A unit id that is not part of the ring.
    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    /// A stepper was handed a set of actors that is not exactly one per unit
    /// of its ring.
    #[error("expected one actor for each of the {expected} units, got {found}")]
    ActorCount { expected: usize, found: usize },

    /// An actor that belongs to a different ring, or a second actor for the
    /// same unit.
    #[error("actor for unit {0} does not belong to this ring")]
    ForeignActor(UnitId),
}
