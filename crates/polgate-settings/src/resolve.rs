use crate::error::ConfigError;
use crate::model::PolicyConfigV1;
use polgate_domain::model::{EnforcementSchedule, PolicySet, PolicySpec};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Upper bound on override token length; longer tokens make substring
/// matching against comment bodies ambiguous.
pub const MAX_OVERRIDE_TOKEN_LEN: usize = 255;

const SUPPORTED_CHECK_TYPE: &str = "opa";

/// Validate the parsed config and resolve it into the domain policy set.
/// Any violation aborts the whole load.
pub fn resolve_policies(cfg: PolicyConfigV1) -> Result<PolicySet, ConfigError> {
    if cfg.policies.is_empty() {
        return Err(ConfigError::EmptyPolicySet);
    }

    let mut seen_tokens: BTreeMap<String, String> = BTreeMap::new();
    let mut policies = BTreeMap::new();

    for (id, policy) in cfg.policies {
        if policy.name.is_empty() {
            return Err(ConfigError::MissingName { id });
        }
        if policy.check_type != SUPPORTED_CHECK_TYPE {
            return Err(ConfigError::UnsupportedCheckType {
                id,
                check_type: policy.check_type,
            });
        }
        if policy.check_artifact_path.is_empty() {
            return Err(ConfigError::MissingArtifactPath { id });
        }

        let enforcement = &policy.enforcement;
        validate_order(
            &id,
            ("inEffectAfter", enforcement.in_effect_after),
            ("warningAfter", enforcement.warning_after),
        )?;
        validate_order(
            &id,
            ("warningAfter", enforcement.warning_after),
            ("blockingAfter", enforcement.blocking_after),
        )?;
        validate_order(
            &id,
            ("inEffectAfter", enforcement.in_effect_after),
            ("blockingAfter", enforcement.blocking_after),
        )?;

        let token = enforcement.override_config.comment_token.trim();
        let override_token = if enforcement.override_config.comment_token.is_empty() {
            None
        } else if token.is_empty() {
            return Err(ConfigError::EmptyOverrideToken { id });
        } else if token.len() > MAX_OVERRIDE_TOKEN_LEN {
            return Err(ConfigError::OverrideTokenTooLong { id });
        } else {
            if let Some(first) = seen_tokens.insert(token.to_string(), id.clone()) {
                return Err(ConfigError::DuplicateOverrideToken {
                    token: token.to_string(),
                    first,
                    second: id,
                });
            }
            Some(token.to_string())
        };

        policies.insert(
            id.clone(),
            PolicySpec {
                id: id.clone(),
                name: policy.name,
                description: policy.description,
                check_artifact: policy.check_artifact_path,
                override_token,
                schedule: EnforcementSchedule {
                    in_effect_after: enforcement.in_effect_after,
                    warning_after: enforcement.warning_after,
                    blocking_after: enforcement.blocking_after,
                },
            },
        );
    }

    Ok(PolicySet { policies })
}

fn validate_order(
    id: &str,
    earlier: (&'static str, Option<OffsetDateTime>),
    later: (&'static str, Option<OffsetDateTime>),
) -> Result<(), ConfigError> {
    if let (Some(a), Some(b)) = (earlier.1, later.1) {
        if b < a {
            return Err(ConfigError::ScheduleOrder {
                id: id.to_string(),
                earlier: earlier.0,
                later: later.0,
            });
        }
    }
    Ok(())
}
