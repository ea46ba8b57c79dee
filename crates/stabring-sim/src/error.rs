//! Error types for stabring-sim.

use stabring_core::TopologyError;
use thiserror::Error;

/// Result type for simulation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up or running a simulation.
#[derive(Debug, Error)]
pub enum Error {
    /// No process count on the command line
    #[error("missing number of processes")]
    MissingArgument,

    /// Process count out of range, or not a number
    #[error("there must be between 3 and 65536 processes for the algorithm to make sense (got {0:?})")]
    InvalidProcessCount(String),

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Ring assembly failed
    #[error("topology error: {0}")]
    Topology(#[from] TopologyError),

    /// Snapshot output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot serialization failed
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Process exit status for this error.
    ///
    /// A missing count and a bad count get distinct statuses.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::MissingArgument => 1,
            Error::InvalidProcessCount(_)
            | Error::Topology(TopologyError::TooFewUnits { .. })
            | Error::Topology(TopologyError::TooManyUnits { .. }) => 2,
            _ => 3,
        }
    }
}
