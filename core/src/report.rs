//! Result aggregation.
//!
//! Walks the batch in its original order, classifies each sealed payload and
//! produces one [`ReportSection`] per target. Nothing here is fatal: a batch
//! in which every target came back empty is still a complete report.

use std::time::Duration;

use probr_common::target::{ScanBatch, ScanTarget};
use serde_json::Value;

use crate::capture::SealedCapture;
use crate::probe::ProbeExit;
use crate::sanitize::SanitizedPayload;
use crate::scanner::ScanRun;

#[derive(Clone, Debug, PartialEq)]
pub enum ScanOutcome {
    /// The payload parsed as JSON.
    Parsed(Value),
    /// Something that looked structured but did not parse. Shown as text.
    UnparsedRaw(String),
    /// No structured payload at all.
    Empty,
}

impl ScanOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            ScanOutcome::Parsed(_) => "parsed",
            ScanOutcome::UnparsedRaw(_) => "unparsed",
            ScanOutcome::Empty => "empty",
        }
    }
}

/// Confirms the sanitizer's syntactic guess with a real parse.
pub fn classify(payload: &SanitizedPayload) -> ScanOutcome {
    if payload.is_empty() {
        return ScanOutcome::Empty;
    }

    match serde_json::from_str::<Value>(payload.as_str()) {
        Ok(value) => ScanOutcome::Parsed(value),
        Err(_) => ScanOutcome::UnparsedRaw(payload.as_str().to_string()),
    }
}

#[derive(Clone, Debug)]
pub struct ReportSection {
    pub index: usize,
    pub target: ScanTarget,
    pub exit: ProbeExit,
    pub elapsed: Duration,
    pub outcome: ScanOutcome,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub parsed: usize,
    pub unparsed: usize,
    pub empty: usize,
}

impl Summary {
    pub fn total(&self) -> usize {
        self.parsed + self.unparsed + self.empty
    }
}

#[derive(Clone, Debug)]
pub struct Report {
    pub sections: Vec<ReportSection>,
    pub elapsed: Duration,
}

impl Report {
    pub fn summary(&self) -> Summary {
        self.sections
            .iter()
            .fold(Summary::default(), |mut acc, section| {
                match section.outcome {
                    ScanOutcome::Parsed(_) => acc.parsed += 1,
                    ScanOutcome::UnparsedRaw(_) => acc.unparsed += 1,
                    ScanOutcome::Empty => acc.empty += 1,
                }
                acc
            })
    }
}

/// Builds the report in batch order, one section per target.
pub fn aggregate(batch: &ScanBatch, run: &ScanRun) -> Report {
    let sections: Vec<ReportSection> = batch
        .iter()
        .zip(run.captures())
        .map(|(_, capture)| section_from(capture))
        .collect();

    Report {
        sections,
        elapsed: run.elapsed(),
    }
}

fn section_from(capture: &SealedCapture) -> ReportSection {
    ReportSection {
        index: capture.index,
        target: capture.target.clone(),
        exit: capture.exit.clone(),
        elapsed: capture.elapsed,
        outcome: classify(&capture.payload),
    }
}
