//! Command line definition.

use std::time::Duration;

use clap::Parser;
use stabring_core::{MAX_UNITS, MIN_UNITS};

use crate::config::{OutputFormat, SimulationConfig};
use crate::error::{Error, Result};

/// Dijkstra's self-stabilizing token ring, one task per process
#[derive(Parser, Debug)]
#[command(name = "stabring")]
#[command(version)]
#[command(
    long_about = "Runs N processes in a ring, each applying Dijkstra's K-state rule after a \
                  random exponential delay, and prints the ring every time a process moves. \
                  Privileged processes are underlined; the process that just moved is marked."
)]
pub struct Cli {
    /// Number of processes in the ring (3 to 65536)
    #[arg(allow_hyphen_values = true)]
    pub processes: Option<String>,

    /// Seed for the delay generators (random when omitted) [env: STABRING_SEED]
    #[arg(long)]
    pub seed: Option<u64>,

    /// Mean delay between attempts, in time units [env: STABRING_MEAN_DELAY]
    #[arg(long)]
    pub mean_delay: Option<f64>,

    /// Length of one time unit in milliseconds [env: STABRING_TIME_UNIT_MS]
    #[arg(long)]
    pub time_unit_ms: Option<u64>,

    /// Stop after this many notifications
    #[arg(long)]
    pub limit: Option<usize>,

    /// Snapshot format
    #[arg(long, value_enum, default_value_t = OutputFormat::Unicode)]
    pub format: OutputFormat,

    /// Notifications buffered before processes wait for the printer
    #[arg(long)]
    pub channel_capacity: Option<usize>,
}

impl Cli {
    /// Build the run configuration on top of `base`.
    ///
    /// The process count is checked first, so a missing or bad count is
    /// reported even when other settings are wrong too.
    pub fn into_config<F>(self, base: F) -> Result<SimulationConfig>
    where
        F: FnOnce() -> Result<SimulationConfig>,
    {
        let process_count = parse_process_count(self.processes.as_deref())?;
        let mut config = base()?;

        config.process_count = process_count;
        config.format = self.format;
        config.limit = self.limit;
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(mean_delay) = self.mean_delay {
            config.mean_delay = mean_delay;
        }
        if let Some(millis) = self.time_unit_ms {
            config.time_unit = Duration::from_millis(millis);
        }
        if let Some(capacity) = self.channel_capacity {
            config.channel_capacity = capacity;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Parse the positional process count.
///
/// Anything that is not an integer in `MIN_UNITS..=MAX_UNITS` is an invalid
/// count.
pub fn parse_process_count(raw: Option<&str>) -> Result<usize> {
    let raw = raw.ok_or(Error::MissingArgument)?;
    match raw.trim().parse::<usize>() {
        Ok(count) if (MIN_UNITS..=MAX_UNITS).contains(&count) => Ok(count),
        _ => Err(Error::InvalidProcessCount(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("stabring").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn process_count_validation() {
        assert!(matches!(parse_process_count(None), Err(Error::MissingArgument)));
        assert_eq!(parse_process_count(Some("3")).unwrap(), 3);
        assert_eq!(parse_process_count(Some(" 12 ")).unwrap(), 12);

        assert_eq!(parse_process_count(Some("65536")).unwrap(), MAX_UNITS);

        for bad in [
            "2",
            "0",
            "-4",
            "five",
            "5abc",
            "",
            "65537",
            "18446744073709551615",
            "18446744073709551616",
        ] {
            let err = parse_process_count(Some(bad)).unwrap_err();
            assert_eq!(err.exit_code(), 2, "{:?} should be an invalid count", bad);
        }
    }

    #[test]
    fn missing_count_wins_over_bad_environment() {
        let err = parse(&[])
            .into_config(|| Err(Error::Config("broken".into())))
            .unwrap_err();
        assert!(matches!(err, Error::MissingArgument));
    }

    #[test]
    fn flags_override_base() {
        let cli = parse(&[
            "7",
            "--seed",
            "9",
            "--mean-delay",
            "2.5",
            "--time-unit-ms",
            "10",
            "--limit",
            "100",
            "--format",
            "json",
            "--channel-capacity",
            "2",
        ]);
        let base = SimulationConfig {
            seed: Some(1),
            mean_delay: 8.0,
            ..Default::default()
        };
        let config = cli.into_config(|| Ok(base)).unwrap();

        assert_eq!(config.process_count, 7);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.mean_delay, 2.5);
        assert_eq!(config.time_unit, Duration::from_millis(10));
        assert_eq!(config.limit, Some(100));
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.channel_capacity, 2);
    }

    #[test]
    fn base_kept_when_flags_absent() {
        let base = SimulationConfig {
            seed: Some(4),
            mean_delay: 0.25,
            ..Default::default()
        };
        let config = parse(&["5"]).into_config(|| Ok(base)).unwrap();
        assert_eq!(config.seed, Some(4));
        assert_eq!(config.mean_delay, 0.25);
        assert_eq!(config.format, OutputFormat::Unicode);
        assert_eq!(config.limit, None);
    }

    #[test]
    fn invalid_flag_values_fail_validation() {
        let err = parse(&["5", "--channel-capacity", "0"])
            .into_config(|| Ok(SimulationConfig::default()))
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
