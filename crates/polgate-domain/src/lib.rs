//! Pure policy enforcement decisions (no IO).
//!
//! Input: a validated policy set, per-(policy, environment) check outcomes,
//! the comment history, and the evaluation instant.
//! Output: per-environment summaries, the outcome matrix, and the final
//! block/warn/pass decision.

#![forbid(unsafe_code)]

pub mod aggregate;
pub mod decision;
pub mod model;
pub mod overrides;
pub mod report;
pub mod schedule;

#[cfg(test)]
mod proptest;

pub use report::{build_report, ReportError, ReportInputs};
