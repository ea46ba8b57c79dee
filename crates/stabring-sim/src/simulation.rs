//! Wiring: build the ring, print it, start the loops, observe.

use std::io::Write;
use std::sync::Arc;

use stabring_core::{Actor, Ring, RingBuilder};
use tracing::info;

use crate::channel::notification_channel;
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::observer::{Observer, RunSummary};
use crate::runner::spawn_units;

/// A ready-to-run simulation.
pub struct Simulation {
    config: SimulationConfig,
    ring: Arc<Ring>,
    actors: Vec<Actor>,
}

impl Simulation {
    /// Validate the configuration and build the ring.
    ///
    /// Nothing runs until [`Simulation::run`].
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let (ring, actors) = RingBuilder::new(config.process_count).build()?;
        Ok(Self {
            config,
            ring,
            actors,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The ring being simulated.
    pub fn ring(&self) -> &Arc<Ring> {
        &self.ring
    }

    /// Print the initial snapshot, then run every unit concurrently and print
    /// a snapshot per notification.
    ///
    /// The loops start only after the initial snapshot is written, so it
    /// always shows the starting configuration. Returns when the notification
    /// limit is reached; without a limit it runs until the process exits.
    /// Must be called inside a tokio runtime.
    pub async fn run<W: Write>(self, sink: W) -> Result<RunSummary> {
        let Self {
            config,
            ring,
            actors,
        } = self;

        let (notifier, notifications) = notification_channel(config.channel_capacity);
        let mut observer = Observer::new(Arc::clone(&ring), sink, config.format, config.limit);
        observer.print_initial()?;

        info!(
            units = ring.len(),
            mean_delay = config.mean_delay,
            time_unit = ?config.time_unit,
            seed = ?config.seed,
            "starting execution loops"
        );
        let handles = spawn_units(actors, &config, &notifier);
        drop(notifier);

        let summary = observer.run(notifications).await;
        for handle in &handles {
            handle.abort();
        }
        summary
    }
}
