//! Stabring binary
//!
//! Prints an endless stream of ring snapshots as the units converge and pass
//! the token around.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use stabring_sim::{Cli, Result, RunSummary, Simulation, SimulationConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only snapshots.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stabring=info,stabring_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(3);
        }
    };

    match run(cli).await {
        Ok(summary) => {
            tracing::info!(?summary, "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}.");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<RunSummary> {
    let config = cli.into_config(SimulationConfig::from_env)?;
    let simulation = Simulation::new(config)?;
    simulation.run(std::io::stdout().lock()).await
}
