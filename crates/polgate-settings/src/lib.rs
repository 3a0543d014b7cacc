//! Policy configuration parsing and validation.
//!
//! This crate is intentionally IO-free: it parses and validates the policy
//! set provided as a YAML string. Artifact existence is backend knowledge
//! and is verified separately by `polgate-backend`.

#![forbid(unsafe_code)]

mod error;
mod model;
mod resolve;

pub use error::ConfigError;
pub use model::{EnforcementConfig, OverrideConfig, PolicyConfig, PolicyConfigV1};
pub use resolve::{resolve_policies, MAX_OVERRIDE_TOKEN_LEN};

/// Parse `compliance-config.yaml` (or equivalent) into the typed model.
pub fn parse_policy_yaml(input: &str) -> Result<PolicyConfigV1, ConfigError> {
    let cfg: PolicyConfigV1 = serde_yaml::from_str(input)?;
    Ok(cfg)
}

/// Parse and validate in one step, yielding the domain policy set.
pub fn load_policy_set(input: &str) -> Result<polgate_domain::model::PolicySet, ConfigError> {
    resolve_policies(parse_policy_yaml(input)?)
}
