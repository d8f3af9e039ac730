//! Per-task capture sinks.
//!
//! Every run gets a private temporary directory. Each task writes to its own
//! file inside it, named after the task's batch index so two identical
//! targets never share a sink. The directory is removed when the
//! [`SinkDir`] is dropped or closed.

use std::io;
use std::path::{Path, PathBuf};

use probr_common::target::ScanTarget;
use tempfile::TempDir;

const SINK_PREFIX: &str = "probr-";
const MAX_LABEL_LEN: usize = 48;

#[derive(Debug)]
pub struct SinkDir {
    dir: TempDir,
}

impl SinkDir {
    pub fn new() -> io::Result<Self> {
        let dir: TempDir = tempfile::Builder::new().prefix(SINK_PREFIX).tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the sink for the task at `index`.
    ///
    /// The index makes the name unique; the target label only aids debugging.
    pub fn sink_for(&self, index: usize, target: &ScanTarget) -> PathBuf {
        self.dir.path().join(format!("{index:05}-{}.out", label(target)))
    }

    /// Removes the directory, surfacing any error instead of ignoring it.
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }
}

fn label(target: &ScanTarget) -> String {
    target
        .as_str()
        .chars()
        .take(MAX_LABEL_LEN)
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect()
}
