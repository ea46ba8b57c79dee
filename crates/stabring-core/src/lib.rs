//! Stabring Core
//!
//! Dijkstra's K-state self-stabilizing mutual exclusion on a unidirectional ring.
//!
//! # The Algorithm
//!
//! N units sit in a ring. Each unit reads exactly one neighbor (its
//! predecessor) and writes only its own value:
//! - Regular units are privileged when `value != neighbor`, and act by copying
//!   the neighbor's value.
//! - The ring-closing unit (id 0) is privileged when `value == neighbor`, and
//!   acts by incrementing its value modulo N.
//!
//! Every configuration has at least one privileged unit, and any sequence of
//! moves reaches a configuration with exactly one. From then on the single
//! privilege (the token) circulates forever.
//!
//! # Shared State
//!
//! Values live in atomic cells. A unit's value is written only through its
//! [`Actor`], and the builder hands out exactly one actor per unit. Neighbor
//! reads are not synchronized with the neighbor's writes; each read observes
//! some whole prior value.

mod convergence;
mod error;
mod ring;
mod snapshot;
mod stepper;
mod unit;

pub use convergence::{Convergence, Observation};
pub use error::{Result, TopologyError};
pub use ring::{Actor, Ring, RingBuilder, Walk};
pub use snapshot::{RingSnapshot, UnitState};
pub use stepper::Stepper;
pub use unit::{ProcessUnit, Rule, UnitId};

/// Smallest ring that distinguishes the ring-closing unit from regular ones.
pub const MIN_UNITS: usize = 3;

/// Largest ring a builder accepts.
pub const MAX_UNITS: usize = 1 << 16;
