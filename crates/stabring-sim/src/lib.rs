//! Stabring Simulation
//!
//! Runs Dijkstra's self-stabilizing token ring with real concurrency and
//! prints the ring each time a unit moves.
//!
//! # Architecture
//!
//! - **Delay**: exponential think time per unit (mean 5 time units)
//! - **Runner**: one tokio task per unit, `sleep → attempt → notify`
//! - **Channel**: bounded MPSC carrying the id of each unit that moved
//! - **Observer**: receives ids, snapshots the ring, prints, tracks convergence
//! - **Render**: unicode, ascii and JSON snapshot formats
//!
//! # Usage
//!
//! ```no_run
//! use stabring_sim::{Simulation, SimulationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SimulationConfig {
//!         process_count: 5,
//!         limit: Some(100),
//!         ..Default::default()
//!     };
//!     let summary = Simulation::new(config)?.run(std::io::stdout()).await?;
//!     println!("stabilized at {:?}", summary.stabilized_at);
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod cli;
pub mod config;
pub mod delay;
pub mod error;
pub mod observer;
pub mod render;
pub mod runner;
pub mod simulation;

pub use channel::{notification_channel, ChannelClosed, Notifications, Notifier};
pub use cli::Cli;
pub use config::{OutputFormat, SimulationConfig};
pub use delay::ExponentialDelay;
pub use error::{Error, Result};
pub use observer::{Observer, RunSummary};
pub use simulation::Simulation;
