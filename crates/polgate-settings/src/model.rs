use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// `compliance-config.yaml` schema v1.
///
/// This is a *user-facing* config model: field names are part of the config
/// surface and match the published document format.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyConfigV1 {
    /// Map of policy id -> policy config. YAML mapping keys make duplicate
    /// ids impossible by construction.
    #[serde(default)]
    pub policies: BTreeMap<String, PolicyConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PolicyConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Check backend tag; currently only `opa`.
    #[serde(default)]
    pub check_type: String,

    /// Path to the check artifact, relative to the policies root.
    #[serde(default)]
    pub check_artifact_path: String,

    #[serde(default)]
    pub enforcement: EnforcementConfig,
}

/// When and how a policy is enforced. All timestamps are optional ISO-8601;
/// unset means the threshold is never reached.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnforcementConfig {
    #[schemars(with = "Option<String>")]
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub in_effect_after: Option<OffsetDateTime>,

    #[schemars(with = "Option<String>")]
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub warning_after: Option<OffsetDateTime>,

    #[schemars(with = "Option<String>")]
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub blocking_after: Option<OffsetDateTime>,

    #[serde(default, rename = "override")]
    pub override_config: OverrideConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverrideConfig {
    /// Free-text token matched against change-request comments,
    /// e.g. `/pg-override-ha`. Empty means the policy cannot be overridden.
    #[serde(default)]
    pub comment_token: String,
}
