//! Stable DTOs for the polgate report protocol.
//!
//! This crate is intentionally boring:
//! - the pass/fail/error/omitted outcome taxonomy
//! - enforcement levels and the final decision
//! - the report envelope handed to renderers and downstream consumers
//!
//! Field names and variant spellings are part of the wire contract and must
//! not drift between releases.

#![forbid(unsafe_code)]

pub mod report;

pub use report::{
    ComplianceReport, EnforcementDecision, EnforcementLevel, EnvironmentSummary, OutcomeCell,
    OutcomeStatus, PolicyOutcome, PolicyRow, ReportEnvelope, ToolMeta, SCHEMA_REPORT_V1,
};
