pub mod info;
pub mod scan;

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use probr_common::config::{Config, DEFAULT_PORT};
use probr_common::probe::{DEFAULT_PROGRAM, ProbeSpec};

#[derive(Parser)]
#[command(name = "probr")]
#[command(about = "Runs an SSH handshake probe against many hosts at once.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Less decoration; repeat to also hide warnings
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// More logging; repeat for trace output
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the probe configuration a scan would use
    #[command(alias = "i")]
    Info {
        #[command(flatten)]
        probe: ProbeArgs,
    },
    /// Probe one or more hosts
    #[command(alias = "s")]
    Scan {
        /// Hosts to probe; read from stdin when omitted
        targets: Vec<String>,

        #[command(flatten)]
        probe: ProbeArgs,

        /// Maximum number of probes running at once (default: all)
        #[arg(short, long, env = "PROBR_JOBS")]
        jobs: Option<NonZeroUsize>,

        /// Seconds before a probe is killed; 0 waits forever
        #[arg(short, long, env = "PROBR_TIMEOUT", default_value_t = 60)]
        timeout: u64,
    },
}

#[derive(Args, Clone, Debug)]
pub struct ProbeArgs {
    /// Probe executable, by path or name on PATH
    #[arg(long, env = "PROBR_PROBE", default_value = DEFAULT_PROGRAM)]
    pub probe: PathBuf,

    /// Replace the probe arguments; `{endpoint}` expands to host:port
    #[arg(long = "probe-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub probe_args: Vec<String>,

    /// Extra environment variable for the probe process
    #[arg(long = "probe-env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub probe_env: Vec<(String, String)>,

    /// Port used for targets that do not name one
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl ProbeArgs {
    pub fn to_spec(&self) -> ProbeSpec {
        let mut spec = ProbeSpec::new(&self.probe);
        if !self.probe_args.is_empty() {
            spec = spec.with_args(self.probe_args.iter().cloned());
        }
        for (key, value) in &self.probe_env {
            spec = spec.with_env(key, value);
        }
        spec
    }

    pub fn to_config(&self, quiet: u8) -> Config {
        Config {
            port: self.port,
            probe: self.to_spec(),
            quiet,
            ..Config::default()
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// `0` disables the deadline.
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    match secs {
        0 => None,
        n => Some(Duration::from_secs(n)),
    }
}

fn parse_env_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}
