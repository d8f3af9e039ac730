//! Launch description for the external probe.
//!
//! Everything the child process needs is carried explicitly here, including
//! extra environment variables. The orchestrator never mutates its own
//! environment to influence a probe.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScanError};
use crate::target::Endpoint;

/// Replaced with the `host:port` endpoint in every probe argument.
pub const ENDPOINT_PLACEHOLDER: &str = "{endpoint}";

pub const DEFAULT_PROGRAM: &str = "Terrapin-Scanner";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl Default for ProbeSpec {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl ProbeSpec {
    /// A probe invoked in structured-output mode against `{endpoint}`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: default_args(),
            env: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Arguments for one invocation, with the endpoint substituted.
    pub fn args_for(&self, endpoint: &Endpoint) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(ENDPOINT_PLACEHOLDER, endpoint.as_str()))
            .collect()
    }

    /// Resolves the program to an executable on disk.
    ///
    /// A path with a directory component must point at an executable file.
    /// A bare name is looked up on `PATH`.
    pub fn resolve(&self) -> Result<PathBuf> {
        let unavailable = || ScanError::ProbeUnavailable {
            program: self.program.clone(),
        };

        if self.program.components().count() > 1 {
            return if is_executable(&self.program) {
                Ok(self.program.clone())
            } else {
                Err(unavailable())
            };
        }

        let path_var = env::var_os("PATH").ok_or_else(unavailable)?;
        env::split_paths(&path_var)
            .flat_map(|dir| candidates(&dir, &self.program))
            .find(|candidate| is_executable(candidate))
            .ok_or_else(unavailable)
    }
}

fn default_args() -> Vec<String> {
    vec![
        "--json".to_string(),
        "--connect".to_string(),
        ENDPOINT_PLACEHOLDER.to_string(),
    ]
}

#[cfg(windows)]
fn candidates(dir: &Path, program: &Path) -> Vec<PathBuf> {
    let plain = dir.join(program);
    let exe = plain.with_extension("exe");
    vec![plain, exe]
}

#[cfg(not(windows))]
fn candidates(dir: &Path, program: &Path) -> Vec<PathBuf> {
    vec![dir.join(program)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
