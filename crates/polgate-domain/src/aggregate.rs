use polgate_types::{EnforcementLevel, EnvironmentSummary, OutcomeStatus, PolicyOutcome};
use std::collections::{BTreeMap, BTreeSet};

/// How one outcome counts toward its environment's tallies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Passed,
    /// Non-omitted failure, bucketed under the policy's current level.
    Failed(EnforcementLevel),
    Errored,
    /// Visible in the report but excluded from enforcement: the failure was
    /// overridden or the policy is not yet in effect.
    Omitted,
}

/// Classify a single outcome given its policy's level and override status.
///
/// Errors never count toward pass/fail and never trigger enforcement.
pub fn classify(
    outcome: &PolicyOutcome,
    level: EnforcementLevel,
    overridden: bool,
) -> Classification {
    match outcome.status {
        OutcomeStatus::Error => Classification::Errored,
        OutcomeStatus::Pass => Classification::Passed,
        OutcomeStatus::Fail => {
            if overridden || !level.is_in_effect() {
                Classification::Omitted
            } else {
                Classification::Failed(level)
            }
        }
    }
}

/// Fold one environment's outcomes into a summary.
///
/// Every outcome lands in exactly one of passed/failed/errored/omitted, so
/// `passed + failed + errored + omitted == total` holds by construction.
pub fn summarize_environment<'a>(
    environment: &str,
    outcomes: impl IntoIterator<Item = &'a PolicyOutcome>,
    levels: &BTreeMap<String, EnforcementLevel>,
    overrides: &BTreeSet<String>,
) -> EnvironmentSummary {
    let mut summary = EnvironmentSummary {
        environment: environment.to_string(),
        ..EnvironmentSummary::default()
    };

    for outcome in outcomes {
        let level = levels
            .get(&outcome.policy_id)
            .copied()
            .unwrap_or(EnforcementLevel::NotInEffect);
        let overridden = overrides.contains(&outcome.policy_id);

        summary.total += 1;
        match classify(outcome, level, overridden) {
            Classification::Passed => summary.passed += 1,
            Classification::Errored => summary.errored += 1,
            Classification::Omitted => summary.omitted += 1,
            Classification::Failed(level) => {
                summary.failed += 1;
                match level {
                    EnforcementLevel::Block => summary.block_failures += 1,
                    EnforcementLevel::Warning => summary.warning_failures += 1,
                    EnforcementLevel::Recommend => summary.recommend_failures += 1,
                    EnforcementLevel::NotInEffect => unreachable!("not in effect is omitted"),
                }
            }
        }
    }

    summary
}
