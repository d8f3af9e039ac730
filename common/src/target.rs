//! # Scan Target Model
//!
//! Defines what the user asks to be probed.
//!
//! A target is an opaque host identifier: an IPv4/IPv6 literal, a hostname,
//! or either of those with an explicit port. The batch keeps the order in
//! which targets were supplied, and that order is the order of the report.
//! Duplicates are kept; every occurrence is scanned on its own.

use std::fmt;
use std::net::Ipv6Addr;
use std::ops::Index;

use crate::error::{Result, ScanError};

/// A single host identifier as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScanTarget(String);

impl ScanTarget {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the `host:port` endpoint handed to the probe.
    ///
    /// A target that already names a port keeps it. Bare IPv6 literals are
    /// bracketed so the port separator stays unambiguous.
    pub fn endpoint(&self, default_port: u16) -> Endpoint {
        let raw: &str = &self.0;

        if has_explicit_port(raw) {
            return Endpoint(raw.to_string());
        }

        if raw.starts_with('[') && raw.ends_with(']') {
            return Endpoint(format!("{raw}:{default_port}"));
        }

        if raw.parse::<Ipv6Addr>().is_ok() {
            return Endpoint(format!("[{raw}]:{default_port}"));
        }

        Endpoint(format!("{raw}:{default_port}"))
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `host:port` string passed to the external probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The ordered targets of one run.
///
/// Never empty: the only way to obtain one is through [`validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanBatch {
    targets: Vec<ScanTarget>,
}

impl ScanBatch {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScanTarget> {
        self.targets.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ScanTarget> {
        self.targets.get(index)
    }
}

impl Index<usize> for ScanBatch {
    type Output = ScanTarget;

    fn index(&self, index: usize) -> &Self::Output {
        &self.targets[index]
    }
}

impl<'a> IntoIterator for &'a ScanBatch {
    type Item = &'a ScanTarget;
    type IntoIter = std::slice::Iter<'a, ScanTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

/// Turns the raw request into a [`ScanBatch`].
///
/// Fails with [`ScanError::EmptyBatch`] when nothing was requested. Order is
/// preserved and nothing is deduplicated, sorted or trimmed. An entry made
/// only of whitespace cannot name a host and is rejected with
/// [`ScanError::BlankTarget`].
pub fn validate<I, S>(raw: I) -> Result<ScanBatch>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut targets: Vec<ScanTarget> = Vec::new();

    for (index, item) in raw.into_iter().enumerate() {
        let item: String = item.into();
        if item.trim().is_empty() {
            return Err(ScanError::BlankTarget { index });
        }
        targets.push(ScanTarget(item));
    }

    if targets.is_empty() {
        return Err(ScanError::EmptyBatch);
    }

    Ok(ScanBatch { targets })
}

/// Splits free-form input ("10.0.0.1 10.0.0.2\nhost") on any whitespace.
pub fn split_input(input: &str) -> Vec<String> {
    input.split_whitespace().map(String::from).collect()
}

fn has_explicit_port(raw: &str) -> bool {
    if let Some(rest) = raw.strip_prefix('[') {
        return match rest.split_once("]:") {
            Some((_, port)) => port.parse::<u16>().is_ok(),
            None => false,
        };
    }

    // More than one colon without brackets is an IPv6 literal, not a port.
    match raw.split_once(':') {
        Some((host, port)) => !host.is_empty() && !port.contains(':') && port.parse::<u16>().is_ok(),
        None => false,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
