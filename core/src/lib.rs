//! # probr core
//!
//! The concurrent scan orchestrator.
//!
//! * [`scanner`] fans a [`ScanBatch`](probr_common::target::ScanBatch) out into
//!   one isolated task per target and waits for every one of them.
//! * [`task`] runs a single [`Probe`](probe::Probe) invocation into a private
//!   sink and seals the result.
//! * [`sanitize`] recovers the structured payload from a noisy capture.
//! * [`report`] classifies sealed captures in batch order.

pub mod capture;
pub mod probe;
pub mod report;
pub mod sanitize;
pub mod scanner;
pub mod sink;
pub mod task;
