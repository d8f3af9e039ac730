use std::num::NonZeroUsize;
use std::time::Duration;

use crate::probe::ProbeSpec;

/// Service port probed when a target does not name one.
pub const DEFAULT_PORT: u16 = 22;

/// Wall-clock budget for a single probe invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
pub struct Config {
    /// Port appended to targets that carry none.
    pub port: u16,
    /// How the external probe is launched.
    pub probe: ProbeSpec,
    /// Upper bound on simultaneously running probes.
    ///
    /// `None` launches every target at once, so the batch size is also the
    /// peak number of child processes.
    pub jobs: Option<NonZeroUsize>,
    /// Per-probe deadline. `None` lets a hung probe hold the batch open.
    pub timeout: Option<Duration>,
    /// Terminal verbosity reduction, one step per `-q`.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            probe: ProbeSpec::default(),
            jobs: None,
            timeout: Some(DEFAULT_TIMEOUT),
            quiet: 0,
        }
    }
}
