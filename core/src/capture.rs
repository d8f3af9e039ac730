//! Raw and sealed per-target captures.

use std::time::Duration;

use probr_common::target::ScanTarget;

use crate::probe::ProbeExit;
use crate::sanitize::{self, SanitizedPayload};

/// What one probe run produced, before sanitizing.
#[derive(Debug)]
pub struct ScanCapture {
    /// Position of the target in its batch. Unique even for duplicate targets.
    pub index: usize,
    pub target: ScanTarget,
    pub raw: Vec<u8>,
    pub exit: ProbeExit,
    pub elapsed: Duration,
}

impl ScanCapture {
    /// Applies the sanitizer and freezes the result.
    pub fn seal(self) -> SealedCapture {
        let payload: SanitizedPayload = match self.exit {
            ProbeExit::TimedOut | ProbeExit::Failed { .. } => SanitizedPayload::empty(),
            _ => sanitize::sanitize(&self.raw),
        };

        SealedCapture {
            index: self.index,
            target: self.target,
            exit: self.exit,
            elapsed: self.elapsed,
            payload,
        }
    }
}

/// The immutable result of one isolated scan task.
#[derive(Clone, Debug)]
pub struct SealedCapture {
    pub index: usize,
    pub target: ScanTarget,
    pub exit: ProbeExit,
    pub elapsed: Duration,
    pub payload: SanitizedPayload,
}
