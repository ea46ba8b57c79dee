//! The observer: turns notifications into printed snapshots.

use std::io::Write;
use std::sync::Arc;

use stabring_core::{Convergence, Observation, Ring, RingSnapshot, UnitId};
use tracing::{debug, info, warn};

use crate::channel::Notifications;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::render::write_snapshot;

/// What an observer saw before it stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Notifications received
    pub notifications: u64,
    /// Sequence of the first single-privilege snapshot
    pub stabilized_at: Option<u64>,
    /// Later snapshots with a privilege count other than one
    pub violations: u64,
    /// Notifications received per unit, by id
    pub moves: Vec<u64>,
}

/// Prints a snapshot of the ring for every notification.
pub struct Observer<W> {
    ring: Arc<Ring>,
    sink: W,
    format: OutputFormat,
    limit: Option<usize>,
    convergence: Convergence,
    moves: Vec<u64>,
    received: u64,
}

impl<W: Write> Observer<W> {
    /// Create an observer writing to `sink`.
    pub fn new(ring: Arc<Ring>, sink: W, format: OutputFormat, limit: Option<usize>) -> Self {
        let moves = vec![0; ring.len()];
        Self {
            ring,
            sink,
            format,
            limit,
            convergence: Convergence::new(),
            moves,
            received: 0,
        }
    }

    /// Convergence seen so far.
    pub fn convergence(&self) -> &Convergence {
        &self.convergence
    }

    /// Print the starting state, with no mover marked.
    pub fn print_initial(&mut self) -> Result<()> {
        let snapshot = self.ring.snapshot(0, None);
        self.record(&snapshot)
    }

    /// Print a snapshot for every notification until the limit is reached or
    /// every sender is gone.
    pub async fn run(mut self, mut notifications: Notifications) -> Result<RunSummary> {
        while !self.limit_reached() {
            let Some(id) = notifications.next().await else {
                debug!("all execution loops stopped");
                break;
            };
            self.on_notification(id)?;
        }
        notifications.close();

        let summary = self.summary();
        info!(
            notifications = summary.notifications,
            stabilized_at = ?summary.stabilized_at,
            violations = summary.violations,
            "observer finished"
        );
        Ok(summary)
    }

    fn limit_reached(&self) -> bool {
        self.limit
            .is_some_and(|limit| self.received >= limit as u64)
    }

    /// Handle one notification: count it, snapshot the ring, print.
    pub fn on_notification(&mut self, id: UnitId) -> Result<()> {
        self.received += 1;
        if let Some(count) = self.moves.get_mut(id.index()) {
            *count += 1;
        }
        let snapshot = self.ring.snapshot(self.received, Some(id));
        self.record(&snapshot)
    }

    fn record(&mut self, snapshot: &RingSnapshot) -> Result<()> {
        write_snapshot(&mut self.sink, snapshot, self.format)?;

        match self.convergence.observe(snapshot) {
            Observation::Stabilized => info!(
                sequence = snapshot.sequence,
                holder = ?snapshot.holder(),
                "ring stabilized: single privilege"
            ),
            Observation::Violation { privileged } => warn!(
                sequence = snapshot.sequence,
                privileged,
                "more than one privilege after stabilizing"
            ),
            Observation::Converging { privileged } => debug!(
                sequence = snapshot.sequence,
                privileged,
                "converging"
            ),
            Observation::Stable => {}
        }
        Ok(())
    }

    /// Totals so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            notifications: self.received,
            stabilized_at: self.convergence.stabilized_at(),
            violations: self.convergence.violations(),
            moves: self.moves.clone(),
        }
    }
}
