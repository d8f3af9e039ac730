use std::sync::Arc;

use probr_common::config::Config;
use probr_common::probe::ProbeSpec;
use probr_common::target::ScanBatch;
use probr_core::probe::{Probe, ProcessProbe};
use probr_core::report::{self, Report};
use probr_core::scanner;

/// Stand-in probe. Behaviour is chosen by the host part of the endpoint.
pub const STAND_IN: &str = r#"
case "$1" in
  good*)      echo '{"Vulnerable":false,"Banner":"SSH-2.0-OpenSSH_9.6"}' ;;
  noisy*)     echo 'info: connecting'; echo 'warn: legacy kex only'; echo '{"Vulnerable":true}' ;;
  truncated*) printf '{"Vulnerable":' ;;
  crash*)     echo 'panic: runtime error' >&2; kill -9 $$ ;;
  refused*)   echo 'connection refused'; exit 1 ;;
  hang*)      sleep 30 ;;
  *)          echo "unknown target $1"; exit 2 ;;
esac
"#;

pub fn stand_in_spec() -> ProbeSpec {
    ProbeSpec::new("sh").with_args(["-c", STAND_IN, "probe", "{endpoint}"])
}

pub fn stand_in_probe() -> Arc<dyn Probe> {
    Arc::new(ProcessProbe::new(stand_in_spec()).expect("sh must be on PATH"))
}

pub fn config() -> Config {
    Config {
        probe: stand_in_spec(),
        ..Config::default()
    }
}

/// Runs the batch and builds the report, cleaning up the sink directory.
pub async fn scan_and_report(batch: &ScanBatch, cfg: &Config, probe: Arc<dyn Probe>) -> Report {
    let run = scanner::perform_scan(batch, cfg, probe, None)
        .await
        .expect("sink directory should be creatable");
    let report = report::aggregate(batch, &run);
    run.finish().expect("sink directory should be removable");
    report
}
