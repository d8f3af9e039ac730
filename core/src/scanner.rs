//! The scan fan-out coordinator.
//!
//! [`perform_scan`] launches one isolated task per target and returns only
//! once every task has sealed its capture. Tasks are independent: a crash,
//! hang (up to the configured deadline) or panic in one never cancels or
//! alters another. Completion order is discarded; captures come back indexed
//! by batch position.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use probr_common::config::Config;
use probr_common::error::ScanError;
use probr_common::target::{self, ScanBatch, ScanTarget};
use probr_common::{error, info, success};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::capture::SealedCapture;
use crate::probe::{Probe, ProbeExit};
use crate::sanitize::SanitizedPayload;
use crate::sink::SinkDir;
use crate::task::{self, TaskSpec};

/// Invoked as `(sealed, total)` once when fan-out starts and again each
/// time a task seals, including tasks that aborted. Counts only.
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// All sealed captures of one batch, in batch order, plus the sink directory
/// they were written to.
#[derive(Debug)]
pub struct ScanRun {
    batch: ScanBatch,
    captures: Vec<SealedCapture>,
    sinks: SinkDir,
    elapsed: Duration,
}

impl ScanRun {
    pub fn batch(&self) -> &ScanBatch {
        &self.batch
    }

    pub fn captures(&self) -> &[SealedCapture] {
        &self.captures
    }

    pub fn capture(&self, index: usize) -> Option<&SealedCapture> {
        self.captures.get(index)
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn sinks(&self) -> &SinkDir {
        &self.sinks
    }

    /// Removes the batch's sink directory.
    pub fn finish(self) -> std::io::Result<()> {
        self.sinks.close()
    }
}

/// Validates `raw` and scans the resulting batch.
///
/// An empty or blank-containing list is rejected before the sink directory
/// is created or `probe` is invoked even once.
pub async fn scan_targets<I, S>(
    raw: I,
    cfg: &Config,
    probe: Arc<dyn Probe>,
    on_sealed: Option<ProgressCallback>,
) -> Result<ScanRun, ScanError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let batch: ScanBatch = target::validate(raw)?;

    let unit: &str = if batch.len() == 1 { "target" } else { "targets" };
    success!(
        "{} {unit} queued for {}",
        batch.len(),
        cfg.probe.program.display()
    );

    perform_scan(&batch, cfg, probe, on_sealed).await
}

/// Scans every target of `batch` and waits for all of them.
///
/// The only error is failing to create the sink directory, which happens
/// before any probe is launched.
pub async fn perform_scan(
    batch: &ScanBatch,
    cfg: &Config,
    probe: Arc<dyn Probe>,
    on_sealed: Option<ProgressCallback>,
) -> Result<ScanRun, ScanError> {
    let sinks: SinkDir = SinkDir::new()?;
    let started: Instant = Instant::now();

    let limiter: Option<Arc<Semaphore>> = cfg.jobs.map(|n| Arc::new(Semaphore::new(n.get())));
    let sealed_count = Arc::new(AtomicUsize::new(0));

    match cfg.jobs {
        Some(n) => info!("Probing {} targets, at most {} at a time", batch.len(), n),
        None => info!("Probing {} targets concurrently", batch.len()),
    }

    let total: usize = batch.len();
    if let Some(cb) = &on_sealed {
        cb(0, total);
    }

    let mut handles: Vec<JoinHandle<SealedCapture>> = Vec::with_capacity(batch.len());

    for (index, target) in batch.iter().enumerate() {
        let spec = TaskSpec {
            index,
            target: target.clone(),
            endpoint: target.endpoint(cfg.port),
            sink: sinks.sink_for(index, target),
            timeout: cfg.timeout,
        };

        let probe = Arc::clone(&probe);
        let limiter = limiter.clone();
        let count_ref = Arc::clone(&sealed_count);
        let cb_ref = on_sealed.clone();

        let handle = tokio::spawn(async move {
            // Held until the task seals. The semaphore is never closed.
            let _permit = match limiter {
                Some(sem) => sem.acquire_owned().await.ok(),
                None => None,
            };

            let sealed = task::run_isolated(probe.as_ref(), spec).await;

            let done = count_ref.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(cb) = cb_ref {
                cb(done, total);
            }
            sealed
        });
        handles.push(handle);
    }

    // Barrier: every handle is awaited before anything is returned.
    let mut captures: Vec<SealedCapture> = Vec::with_capacity(handles.len());
    for (index, handle) in handles.into_iter().enumerate() {
        let sealed = match handle.await {
            Ok(sealed) => sealed,
            Err(e) => {
                error!("Scan task for {} aborted: {}", batch[index], e);
                let done = sealed_count.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(cb) = &on_sealed {
                    cb(done, total);
                }
                aborted_capture(index, &batch[index], e.to_string())
            }
        };
        captures.push(sealed);
    }

    Ok(ScanRun {
        batch: batch.clone(),
        captures,
        sinks,
        elapsed: started.elapsed(),
    })
}

fn aborted_capture(index: usize, target: &ScanTarget, reason: String) -> SealedCapture {
    SealedCapture {
        index,
        target: target.clone(),
        exit: ProbeExit::Failed { reason },
        elapsed: Duration::ZERO,
        payload: SanitizedPayload::empty(),
    }
}
