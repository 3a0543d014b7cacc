use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for polgate reports.
pub const SCHEMA_REPORT_V1: &str = "polgate.report.v1";

/// Current strictness tier of a policy. Derived from the schedule and the
/// evaluation instant, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnforcementLevel {
    NotInEffect,
    Recommend,
    Warning,
    Block,
}

impl EnforcementLevel {
    pub fn is_in_effect(self) -> bool {
        self != EnforcementLevel::NotInEffect
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnforcementLevel::NotInEffect => "NOT_IN_EFFECT",
            EnforcementLevel::Recommend => "RECOMMEND",
            EnforcementLevel::Warning => "WARNING",
            EnforcementLevel::Block => "BLOCK",
        }
    }
}

/// Result of one check invocation for one (policy, environment) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutcomeStatus {
    Pass,
    Fail,
    Error,
}

impl OutcomeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeStatus::Pass => "PASS",
            OutcomeStatus::Fail => "FAIL",
            OutcomeStatus::Error => "ERROR",
        }
    }
}

/// Per-(policy, environment) check outcome.
///
/// Violations are opaque strings relayed verbatim from the check backend;
/// the list is non-empty iff the status is `FAIL`. `error` is present iff
/// the status is `ERROR`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyOutcome {
    pub policy_id: String,
    pub environment: String,
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PolicyOutcome {
    pub fn pass(policy_id: impl Into<String>, environment: impl Into<String>) -> Self {
        Self {
            policy_id: policy_id.into(),
            environment: environment.into(),
            status: OutcomeStatus::Pass,
            violations: Vec::new(),
            error: None,
        }
    }

    pub fn fail(
        policy_id: impl Into<String>,
        environment: impl Into<String>,
        violations: Vec<String>,
    ) -> Self {
        Self {
            policy_id: policy_id.into(),
            environment: environment.into(),
            status: OutcomeStatus::Fail,
            violations,
            error: None,
        }
    }

    pub fn error(
        policy_id: impl Into<String>,
        environment: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            policy_id: policy_id.into(),
            environment: environment.into(),
            status: OutcomeStatus::Error,
            violations: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// One cell of the policy × environment matrix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeCell {
    pub status: OutcomeStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One row of the matrix: a policy with its per-environment outcomes.
///
/// `level` and `overridden` are run-wide; an override applies uniformly to
/// every environment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRow {
    pub policy_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub level: EnforcementLevel,
    pub overridden: bool,
    /// Keyed by environment name; every requested environment has an entry.
    pub outcomes: std::collections::BTreeMap<String, OutcomeCell>,
}

/// Per-environment tallies.
///
/// Conservation invariant: `passed + failed + errored + omitted == total`.
/// `failed` counts non-omitted failures only; omitted covers failures that
/// were overridden or whose policy is not yet in effect.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSummary {
    pub environment: String,
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub errored: u32,
    pub omitted: u32,
    pub block_failures: u32,
    pub warning_failures: u32,
    pub recommend_failures: u32,
}

/// Final verdict, derived strictly from the completed matrix.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnforcementDecision {
    pub should_block: bool,
    pub should_warn: bool,
    pub summary: String,
}

/// The root aggregate: everything a renderer or downstream consumer needs.
///
/// `environments` preserves the caller-supplied ordering; `summaries` is in
/// the same order. Constructed once per run and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub environments: Vec<String>,
    pub policies: Vec<PolicyRow>,
    pub summaries: Vec<EnvironmentSummary>,
    pub decision: EnforcementDecision,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Versioned outer envelope written to disk as `report.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportEnvelope {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_commit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_commit: Option<String>,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub report: ComplianceReport,
}
