pub mod commands;

use crate::k8s::client::DEFAULT_NAMESPACE_FILE;
use crate::k8s::pager::DEFAULT_PAGE_SIZE;
use clap::Parser;
use std::convert::Infallible;
use std::path::PathBuf;
use std::time::Duration;

/// Seconds between cycles in daemon mode when no usable interval is configured.
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "kube-instance-metrics")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Logs CPU and memory usage of every instance in the current namespace", long_about = None)]
pub struct Cli {
    #[arg(short, long, env = "VERBOSE", help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        long,
        env = "JOB_MODE",
        default_value = "daemon",
        value_parser = parse_mode,
        help = "Run mode: 'task' captures once, anything else polls forever"
    )]
    pub mode: Mode,

    #[arg(
        long,
        env = "INTERVAL",
        help = "Seconds to sleep between cycles in daemon mode (default 10)"
    )]
    pub interval: Option<String>,

    #[arg(
        long,
        env = "PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Number of items requested per list call"
    )]
    pub page_size: u32,

    #[arg(
        long,
        env = "NAMESPACE_FILE",
        default_value = DEFAULT_NAMESPACE_FILE,
        help = "File holding the namespace to observe"
    )]
    pub namespace_file: PathBuf,
}

impl Cli {
    pub fn interval(&self) -> Duration {
        resolve_interval(self.interval.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Capture once and exit.
    Task,
    /// Capture repeatedly with a fixed pause between cycles.
    Daemon,
}

fn parse_mode(value: &str) -> Result<Mode, Infallible> {
    Ok(match value {
        "task" => Mode::Task,
        _ => Mode::Daemon,
    })
}

/// Interprets the configured interval, falling back to the default for
/// anything that is not a whole number of seconds.
pub fn resolve_interval(value: Option<&str>) -> Duration {
    let secs = value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_INTERVAL_SECS);

    Duration::from_secs(secs)
}
