use std::sync::Arc;

use tracing::{Instrument, info_span};

use crate::terminal::{format, input, spinner};
use probr_common::target;
use probr_common::{config::Config, warn};
use probr_core::probe::ProcessProbe;
use probr_core::report::{self, Report};
use probr_core::scanner::{self, ScanRun};

pub async fn scan(raw_targets: Vec<String>, cfg: &Config) -> anyhow::Result<()> {
    let raw: Vec<String> = if raw_targets.is_empty() {
        input::read_targets()?
    } else {
        raw_targets.iter().flat_map(|t| target::split_input(t)).collect()
    };

    let probe: ProcessProbe = ProcessProbe::new(cfg.probe.clone())?;

    let span = info_span!("scan", indicatif.pb_show = true);
    spinner::prepare(&span);
    let progress = spinner::progress_callback(span.clone());

    let run: ScanRun = scanner::scan_targets(raw, cfg, Arc::new(probe), Some(progress))
        .instrument(span)
        .await?;

    let report: Report = report::aggregate(run.batch(), &run);
    format::print_report(&report, cfg);

    if let Err(e) = run.finish() {
        warn!("Could not remove capture directory: {e}");
    }
    Ok(())
}
