//! Simulation configuration.
//!
//! Values come from defaults, then environment variables, then the command
//! line, each layer overriding the previous one.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use clap::ValueEnum;
use stabring_core::{MAX_UNITS, MIN_UNITS};

use crate::error::{Error, Result};

/// Mean think time between two attempts, in time units.
pub const DEFAULT_MEAN_DELAY: f64 = 5.0;

/// Length of one time unit.
pub const DEFAULT_TIME_UNIT: Duration = Duration::from_secs(1);

/// Notifications buffered before senders wait.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Ring size used when nothing else is given.
pub const DEFAULT_PROCESS_COUNT: usize = 5;

/// How snapshots are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Combining underline for privileged units, caron for the mover
    #[default]
    Unicode,
    /// `P<id>` for privileged units, `^` after the mover
    Ascii,
    /// One JSON object per snapshot
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Unicode => "unicode",
            OutputFormat::Ascii => "ascii",
            OutputFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Number of units in the ring
    pub process_count: usize,

    /// Seed for the per-unit delay generators; OS entropy when unset
    pub seed: Option<u64>,

    /// Mean of the exponential think time, in time units
    pub mean_delay: f64,

    /// Wall-clock length of one time unit
    pub time_unit: Duration,

    /// Notification channel capacity
    pub channel_capacity: usize,

    /// Stop after this many notifications; run forever when unset
    pub limit: Option<usize>,

    /// Snapshot format
    pub format: OutputFormat,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            process_count: DEFAULT_PROCESS_COUNT,
            seed: None,
            mean_delay: DEFAULT_MEAN_DELAY,
            time_unit: DEFAULT_TIME_UNIT,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            limit: None,
            format: OutputFormat::default(),
        }
    }
}

impl SimulationConfig {
    /// Defaults overridden by `STABRING_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(seed) = parse_var(&lookup, "STABRING_SEED")? {
            config.seed = Some(seed);
        }
        if let Some(mean_delay) = parse_var(&lookup, "STABRING_MEAN_DELAY")? {
            config.mean_delay = mean_delay;
        }
        if let Some(millis) = parse_var(&lookup, "STABRING_TIME_UNIT_MS")? {
            config.time_unit = Duration::from_millis(millis);
        }

        Ok(config)
    }

    /// Check every value before anything is started.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_UNITS..=MAX_UNITS).contains(&self.process_count) {
            return Err(Error::InvalidProcessCount(self.process_count.to_string()));
        }
        if !self.mean_delay.is_finite() || self.mean_delay <= 0.0 {
            return Err(Error::Config(format!(
                "mean delay must be a positive number, got {}",
                self.mean_delay
            )));
        }
        if self.time_unit.is_zero() {
            return Err(Error::Config("time unit must be non-zero".into()));
        }
        if self.channel_capacity == 0 {
            return Err(Error::Config("channel capacity must be at least 1".into()));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("{name}={raw:?}: {e}"))),
    }
}
