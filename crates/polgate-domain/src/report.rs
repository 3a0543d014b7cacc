use crate::{aggregate, decision, model::PolicySet};
use polgate_types::{
    ComplianceReport, EnforcementLevel, OutcomeCell, PolicyOutcome, PolicyRow,
};
use std::collections::{BTreeMap, BTreeSet};

/// Everything the builder needs; all of it immutable for the run.
#[derive(Clone, Debug)]
pub struct ReportInputs<'a> {
    /// Caller-supplied environment ordering, preserved verbatim.
    pub environments: &'a [String],
    pub set: &'a PolicySet,
    /// Resolved level per policy id, computed once per run.
    pub levels: &'a BTreeMap<String, EnforcementLevel>,
    pub overrides: &'a BTreeSet<String>,
    /// The complete (policy × environment) outcome matrix.
    pub outcomes: &'a [PolicyOutcome],
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("missing outcome for policy {policy_id} in environment {environment}")]
    MissingOutcome {
        policy_id: String,
        environment: String,
    },
    #[error("duplicate outcome for policy {policy_id} in environment {environment}")]
    DuplicateOutcome {
        policy_id: String,
        environment: String,
    },
    #[error("outcome references unknown policy {policy_id}")]
    UnknownPolicy { policy_id: String },
    #[error("outcome references unknown environment {environment}")]
    UnknownEnvironment { environment: String },
}

/// Assemble the immutable `ComplianceReport` from a complete matrix.
///
/// This is structural work only: rows in policy-id order, summaries in the
/// caller's environment order, decision derived last. A matrix with a
/// missing or duplicated cell is rejected rather than papered over, so a
/// partial run can never produce a decision.
pub fn build_report(inputs: ReportInputs<'_>) -> Result<ComplianceReport, ReportError> {
    let env_set: BTreeSet<&str> = inputs.environments.iter().map(String::as_str).collect();

    let mut cells: BTreeMap<(&str, &str), &PolicyOutcome> = BTreeMap::new();
    for outcome in inputs.outcomes {
        if !inputs.set.policies.contains_key(&outcome.policy_id) {
            return Err(ReportError::UnknownPolicy {
                policy_id: outcome.policy_id.clone(),
            });
        }
        if !env_set.contains(outcome.environment.as_str()) {
            return Err(ReportError::UnknownEnvironment {
                environment: outcome.environment.clone(),
            });
        }
        let key = (outcome.policy_id.as_str(), outcome.environment.as_str());
        if cells.insert(key, outcome).is_some() {
            return Err(ReportError::DuplicateOutcome {
                policy_id: outcome.policy_id.clone(),
                environment: outcome.environment.clone(),
            });
        }
    }

    let mut policies = Vec::with_capacity(inputs.set.len());
    for (id, spec) in &inputs.set.policies {
        let level = inputs
            .levels
            .get(id)
            .copied()
            .unwrap_or(EnforcementLevel::NotInEffect);

        let mut outcomes = BTreeMap::new();
        for env in inputs.environments {
            let outcome = cells.get(&(id.as_str(), env.as_str())).ok_or_else(|| {
                ReportError::MissingOutcome {
                    policy_id: id.clone(),
                    environment: env.clone(),
                }
            })?;
            outcomes.insert(
                env.clone(),
                OutcomeCell {
                    status: outcome.status,
                    violations: outcome.violations.clone(),
                    error: outcome.error.clone(),
                },
            );
        }

        policies.push(PolicyRow {
            policy_id: id.clone(),
            name: spec.name.clone(),
            description: spec.description.clone(),
            level,
            overridden: inputs.overrides.contains(id),
            outcomes,
        });
    }

    let summaries: Vec<_> = inputs
        .environments
        .iter()
        .map(|env| {
            let env_outcomes = inputs
                .outcomes
                .iter()
                .filter(|o| &o.environment == env);
            aggregate::summarize_environment(env, env_outcomes, inputs.levels, inputs.overrides)
        })
        .collect();

    let decision = decision::decide(&summaries);

    Ok(ComplianceReport {
        environments: inputs.environments.to_vec(),
        policies,
        summaries,
        decision,
    })
}
