//! Use case orchestration for polgate.
//!
//! This crate coordinates the settings, backend, domain, and render layers:
//! it fans evaluation out per environment, waits for the complete outcome
//! matrix, and assembles the report envelope. The CLI depends on this; it
//! only handles argument parsing and exit codes.

#![forbid(unsafe_code)]

mod context;
mod output;
mod run;

pub use context::EvaluationContext;
pub use output::{decision_exit_code, serialize_report, write_report, write_text};
pub use run::{run, CancelFlag, EnvironmentManifest, RunInput};
