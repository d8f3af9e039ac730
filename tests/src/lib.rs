//! End-to-end tests for the scan pipeline: validation, fan-out, sealing,
//! aggregation.

#[cfg(test)]
mod pipeline;

#[cfg(test)]
mod utils;
