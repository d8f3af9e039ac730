//! # probr common
//!
//! Domain types shared by every crate in the workspace: targets and batches,
//! the run configuration, the probe launch description and the fatal error
//! taxonomy. Nothing in here spawns processes or touches the network.

pub mod config;
pub mod error;
pub mod probe;
pub mod target;

#[doc(hidden)]
pub use tracing as __tracing;

/// Target under which report text is emitted. The terminal formatter writes
/// events with this target verbatim, without a level symbol.
pub const PRINT_TARGET: &str = "probr::print";

/// Target used by [`success!`] so the formatter can tell it apart from `info!`.
pub const SUCCESS_TARGET: &str = "probr::success";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "probr::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}
