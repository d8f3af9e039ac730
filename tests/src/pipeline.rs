use std::fs::File;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use probr_common::config::Config;
use probr_common::error::ScanError;
use probr_common::probe::ProbeSpec;
use probr_common::target::{self, Endpoint};
use probr_core::probe::{Probe, ProbeError, ProbeExit, ProcessProbe};
use probr_core::report::{aggregate, ScanOutcome};
use probr_core::scanner::{perform_scan, scan_targets};
use serde_json::json;

use crate::utils;

/// Counts invocations and never produces output.
#[derive(Default)]
struct Counting {
    calls: AtomicUsize,
}

#[async_trait]
impl Probe for Counting {
    async fn run(&self, _endpoint: &Endpoint, _sink: File) -> Result<ProbeExit, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ProbeExit::Exited { code: 0 })
    }
}

#[tokio::test]
async fn empty_target_list_is_fatal_and_launches_nothing() {
    let probe = Arc::new(Counting::default());

    let result = scan_targets(
        target::split_input("   \n"),
        &utils::config(),
        probe.clone(),
        None,
    )
    .await;

    assert!(matches!(result, Err(ScanError::EmptyBatch)));
    assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn blank_target_is_fatal_and_launches_nothing() {
    let probe = Arc::new(Counting::default());

    let result = scan_targets(["a", "  ", "b"], &utils::config(), probe.clone(), None).await;

    assert!(matches!(result, Err(ScanError::BlankTarget { index: 1 })));
    assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn validated_batch_is_launched_once_per_target() {
    let probe = Arc::new(Counting::default());

    let run = scan_targets(["a", "b", "a"], &utils::config(), probe.clone(), None)
        .await
        .unwrap();

    assert_eq!(probe.calls.load(Ordering::SeqCst), 3);
    assert_eq!(run.batch().len(), 3);
    run.finish().unwrap();
}

#[tokio::test]
async fn silent_probe_yields_one_empty_section_per_target() {
    let probe = Arc::new(Counting::default());
    let batch = target::validate(["a", "b", "a"]).unwrap();

    let report = utils::scan_and_report(&batch, &utils::config(), probe.clone()).await;

    assert_eq!(probe.calls.load(Ordering::SeqCst), 3);
    assert_eq!(report.sections.len(), 3);
    assert!(report.sections.iter().all(|s| s.outcome == ScanOutcome::Empty));
    assert_eq!(report.summary().empty, 3);
}

#[test]
fn missing_probe_is_fatal_before_launch() {
    let spec = ProbeSpec::new("/nonexistent/Terrapin-Scanner");
    assert!(matches!(
        ProcessProbe::new(spec),
        Err(ScanError::ProbeUnavailable { .. })
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn mixed_batch_reports_every_target_in_order() {
    let batch = target::validate([
        "crash.example",
        "good.example",
        "noisy.example",
        "truncated.example",
        "refused.example",
        "good.example",
    ])
    .unwrap();

    let report = utils::scan_and_report(&batch, &utils::config(), utils::stand_in_probe()).await;

    let order: Vec<&str> = report.sections.iter().map(|s| s.target.as_str()).collect();
    assert_eq!(
        order,
        vec![
            "crash.example",
            "good.example",
            "noisy.example",
            "truncated.example",
            "refused.example",
            "good.example",
        ]
    );

    let outcomes: Vec<&ScanOutcome> = report.sections.iter().map(|s| &s.outcome).collect();
    assert_eq!(outcomes[0], &ScanOutcome::Empty);
    assert_eq!(
        outcomes[1],
        &ScanOutcome::Parsed(json!({"Vulnerable": false, "Banner": "SSH-2.0-OpenSSH_9.6"}))
    );
    assert_eq!(outcomes[2], &ScanOutcome::Parsed(json!({"Vulnerable": true})));
    assert_eq!(outcomes[3], &ScanOutcome::UnparsedRaw("{\"Vulnerable\":".to_string()));
    assert_eq!(outcomes[4], &ScanOutcome::Empty);
    assert_eq!(outcomes[5], outcomes[1]);

    assert_eq!(report.sections[0].exit, ProbeExit::Killed { signal: Some(9) });
    assert_eq!(report.sections[4].exit, ProbeExit::Exited { code: 1 });

    let summary = report.summary();
    assert_eq!((summary.parsed, summary.unparsed, summary.empty), (3, 1, 2));
}

#[cfg(unix)]
#[tokio::test]
async fn duplicate_targets_keep_separate_captures() {
    let batch = target::validate(["good.example", "good.example"]).unwrap();
    let cfg = utils::config();

    let run = perform_scan(&batch, &cfg, utils::stand_in_probe(), None)
        .await
        .unwrap();

    let first = run.sinks().sink_for(0, &batch[0]);
    let second = run.sinks().sink_for(1, &batch[1]);
    assert_ne!(first, second);
    assert!(first.exists() && second.exists());
    assert_eq!(
        run.capture(0).unwrap().payload,
        run.capture(1).unwrap().payload
    );
    run.finish().unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn hung_probe_is_cut_off_by_deadline() {
    let batch = target::validate(["hang.example", "good.example"]).unwrap();
    let cfg = Config {
        timeout: Some(Duration::from_millis(300)),
        ..utils::config()
    };

    let started = Instant::now();
    let report = utils::scan_and_report(&batch, &cfg, utils::stand_in_probe()).await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(report.sections[0].exit, ProbeExit::TimedOut);
    assert_eq!(report.sections[0].outcome, ScanOutcome::Empty);
    assert!(matches!(report.sections[1].outcome, ScanOutcome::Parsed(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn repeated_runs_share_no_state() {
    let batch = target::validate(["refused.example"]).unwrap();
    let cfg = utils::config();

    let first = perform_scan(&batch, &cfg, utils::stand_in_probe(), None)
        .await
        .unwrap();
    let second = perform_scan(&batch, &cfg, utils::stand_in_probe(), None)
        .await
        .unwrap();

    assert_ne!(first.sinks().path(), second.sinks().path());

    let a = aggregate(&batch, &first);
    let b = aggregate(&batch, &second);
    assert_eq!(a.sections[0].outcome, ScanOutcome::Empty);
    assert_eq!(b.sections[0].outcome, ScanOutcome::Empty);

    first.finish().unwrap();
    second.finish().unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn bounded_pool_still_reports_everything() {
    let batch =
        target::validate(["good.a", "noisy.b", "crash.c", "good.d", "refused.e"]).unwrap();
    let cfg = Config {
        jobs: std::num::NonZeroUsize::new(2),
        ..utils::config()
    };

    let report = utils::scan_and_report(&batch, &cfg, utils::stand_in_probe()).await;

    assert_eq!(report.sections.len(), 5);
    let labels: Vec<&str> = report.sections.iter().map(|s| s.outcome.label()).collect();
    assert_eq!(labels, vec!["parsed", "parsed", "empty", "parsed", "empty"]);
}

#[cfg(unix)]
#[tokio::test]
async fn explicit_port_reaches_the_probe() {
    let script = "printf '{\"endpoint\":\"%s\"}' \"$1\"";
    let spec = ProbeSpec::new("sh").with_args(["-c", script, "echo", "{endpoint}"]);
    let probe: Arc<dyn Probe> = Arc::new(ProcessProbe::new(spec.clone()).unwrap());
    let batch = target::validate(["10.0.0.7", "10.0.0.8:2222", "::1"]).unwrap();
    let cfg = Config {
        probe: spec,
        ..utils::config()
    };

    let report = utils::scan_and_report(&batch, &cfg, probe).await;

    let endpoints: Vec<String> = report
        .sections
        .iter()
        .map(|s| match &s.outcome {
            ScanOutcome::Parsed(v) => v["endpoint"].as_str().unwrap_or_default().to_string(),
            other => panic!("unexpected outcome {other:?}"),
        })
        .collect();
    assert_eq!(endpoints, vec!["10.0.0.7:22", "10.0.0.8:2222", "[::1]:22"]);
}
