//! One isolated scan task.
//!
//! A task owns exactly one sink, runs exactly one probe and always returns a
//! [`SealedCapture`]. Spawn failures, crashes, non-zero exits and timeouts
//! all end up as a (possibly empty) sealed capture; nothing is propagated.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use probr_common::target::{Endpoint, ScanTarget};
use probr_common::warn;
use tracing::debug;

use crate::capture::{ScanCapture, SealedCapture};
use crate::probe::{Probe, ProbeError, ProbeExit};

/// Everything a task needs, moved into it at launch.
#[derive(Debug)]
pub struct TaskSpec {
    pub index: usize,
    pub target: ScanTarget,
    pub endpoint: Endpoint,
    pub sink: PathBuf,
    pub timeout: Option<Duration>,
}

pub async fn run_isolated(probe: &dyn Probe, spec: TaskSpec) -> SealedCapture {
    let started: Instant = Instant::now();
    let exit: ProbeExit = run_probe(probe, &spec).await;

    let raw: Vec<u8> = match exit {
        ProbeExit::TimedOut | ProbeExit::Failed { .. } => Vec::new(),
        _ => read_sink(&spec).await,
    };

    if !exit.is_success() {
        debug!(target = %spec.target, endpoint = %spec.endpoint, %exit, "probe did not succeed");
    }

    let capture = ScanCapture {
        index: spec.index,
        target: spec.target,
        raw,
        exit,
        elapsed: started.elapsed(),
    };

    let sealed: SealedCapture = capture.seal();
    debug!(
        index = sealed.index,
        target = %sealed.target,
        payload_len = sealed.payload.as_str().len(),
        "capture sealed"
    );
    sealed
}

async fn run_probe(probe: &dyn Probe, spec: &TaskSpec) -> ProbeExit {
    let file = match open_sink(spec).await {
        Ok(file) => file,
        Err(err) => return ProbeExit::from(err),
    };

    let run = probe.run(&spec.endpoint, file);

    let result: Result<ProbeExit, ProbeError> = match spec.timeout {
        Some(limit) => match tokio::time::timeout(limit, run).await {
            Ok(result) => result,
            Err(_elapsed) => return ProbeExit::TimedOut,
        },
        None => run.await,
    };

    result.unwrap_or_else(ProbeExit::from)
}

async fn open_sink(spec: &TaskSpec) -> Result<std::fs::File, ProbeError> {
    let file = tokio::fs::File::create(&spec.sink)
        .await
        .map_err(ProbeError::Sink)?;
    Ok(file.into_std().await)
}

async fn read_sink(spec: &TaskSpec) -> Vec<u8> {
    match tokio::fs::read(&spec.sink).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("{}: could not read capture: {}", spec.target, err);
            Vec::new()
        }
    }
}
