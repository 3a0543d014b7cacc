use polgate_domain::model::PolicySet;
use polgate_domain::{overrides, schedule};
use polgate_types::EnforcementLevel;
use std::collections::{BTreeMap, BTreeSet};
use time::OffsetDateTime;

/// Immutable per-run evaluation state: the policy set, each policy's level
/// at the evaluation instant, and the resolved override set.
///
/// Constructed once per run and passed by reference everywhere; concurrent
/// runs (tests included) never share mutable state.
#[derive(Clone, Debug)]
pub struct EvaluationContext {
    pub set: PolicySet,
    pub levels: BTreeMap<String, EnforcementLevel>,
    pub overrides: BTreeSet<String>,
    pub now: OffsetDateTime,
}

impl EvaluationContext {
    pub fn build(set: PolicySet, comments: &[String], now: OffsetDateTime) -> Self {
        let levels = set
            .policies
            .iter()
            .map(|(id, spec)| (id.clone(), schedule::resolve_level(&spec.schedule, now)))
            .collect();
        let overrides = overrides::resolve_overrides(&set, comments);

        Self {
            set,
            levels,
            overrides,
            now,
        }
    }

    pub fn level(&self, policy_id: &str) -> EnforcementLevel {
        self.levels
            .get(policy_id)
            .copied()
            .unwrap_or(EnforcementLevel::NotInEffect)
    }
}
