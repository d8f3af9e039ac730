use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors. Each one aborts the run before a single probe is launched;
/// per-target failures never surface through this type.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("no targets to scan")]
    EmptyBatch,

    #[error("target #{index} is blank")]
    BlankTarget { index: usize },

    #[error("probe '{}' is not available (not found or not executable)", program.display())]
    ProbeUnavailable { program: PathBuf },

    #[error("failed to prepare capture directory: {0}")]
    SinkSetup(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
