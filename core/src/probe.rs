//! The seam between the orchestrator and the external scanner.
//!
//! High-level code only depends on the [`Probe`] trait. [`ProcessProbe`] is
//! the production implementation that spawns the configured program; tests
//! substitute scripted probes to control output and timing.

use std::fmt;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use probr_common::error::ScanError;
use probr_common::probe::ProbeSpec;
use probr_common::target::Endpoint;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Failures inside a single probe run. They are absorbed into the sealed
/// capture and never reach the batch.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to spawn probe: {0}")]
    Spawn(#[source] io::Error),

    #[error("failed to wait for probe: {0}")]
    Wait(#[source] io::Error),

    #[error("capture sink unavailable: {0}")]
    Sink(#[source] io::Error),
}

/// How a probe run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeExit {
    /// The process exited on its own with this status code.
    Exited { code: i32 },
    /// The process was terminated without an exit code (crash, signal).
    Killed { signal: Option<i32> },
    /// The deadline passed and the process was killed.
    TimedOut,
    /// The probe could not be run at all.
    Failed { reason: String },
}

impl ProbeExit {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeExit::Exited { code: 0 })
    }
}

impl From<ExitStatus> for ProbeExit {
    fn from(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => ProbeExit::Exited { code },
            None => ProbeExit::Killed {
                signal: exit_signal(&status),
            },
        }
    }
}

impl From<ProbeError> for ProbeExit {
    fn from(err: ProbeError) -> Self {
        ProbeExit::Failed {
            reason: err.to_string(),
        }
    }
}

impl fmt::Display for ProbeExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeExit::Exited { code } => write!(f, "exit {code}"),
            ProbeExit::Killed { signal: Some(sig) } => write!(f, "killed by signal {sig}"),
            ProbeExit::Killed { signal: None } => f.write_str("killed"),
            ProbeExit::TimedOut => f.write_str("timed out"),
            ProbeExit::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

/// Runs the external scanner once against one endpoint.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Runs to completion, writing the probe's standard output into `sink`.
    ///
    /// Dropping the returned future must stop the underlying work; the
    /// task relies on that to enforce its deadline.
    async fn run(&self, endpoint: &Endpoint, sink: File) -> Result<ProbeExit, ProbeError>;
}

/// Spawns the configured program as a child process per target.
pub struct ProcessProbe {
    program: PathBuf,
    spec: ProbeSpec,
}

impl ProcessProbe {
    /// Resolves the program up front so a missing scanner is reported once,
    /// before anything is launched.
    pub fn new(spec: ProbeSpec) -> Result<Self, ScanError> {
        let program: PathBuf = spec.resolve()?;
        debug!(program = %program.display(), "resolved probe");
        Ok(Self { program, spec })
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    fn command(&self, endpoint: &Endpoint, sink: File) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.spec.args_for(endpoint))
            .envs(self.spec.env.iter().map(|(key, value)| (key.as_str(), value.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::from(sink))
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl Probe for ProcessProbe {
    async fn run(&self, endpoint: &Endpoint, sink: File) -> Result<ProbeExit, ProbeError> {
        let mut child = self
            .command(endpoint, sink)
            .spawn()
            .map_err(ProbeError::Spawn)?;

        debug!(%endpoint, pid = child.id(), "probe started");

        let status: ExitStatus = child.wait().await.map_err(ProbeError::Wait)?;
        Ok(ProbeExit::from(status))
    }
}
