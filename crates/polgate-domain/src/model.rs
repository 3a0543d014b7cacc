use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Validated policy set, keyed by policy id.
///
/// `BTreeMap` keeps iteration deterministic; report rows come out in id
/// order regardless of config file ordering.
#[derive(Clone, Debug, Default)]
pub struct PolicySet {
    pub policies: BTreeMap<String, PolicySpec>,
}

impl PolicySet {
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

/// One compliance rule backed by an opaque check artifact.
#[derive(Clone, Debug)]
pub struct PolicySpec {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Path of the check artifact, relative to the policies root.
    pub check_artifact: String,
    /// Free-text token matched against change-request comments. A policy
    /// with no token can never be overridden.
    pub override_token: Option<String>,
    pub schedule: EnforcementSchedule,
}

/// Three optional, strictly ordered thresholds. An unset threshold is
/// "never reached". Ordering is enforced at load time, not here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnforcementSchedule {
    pub in_effect_after: Option<OffsetDateTime>,
    pub warning_after: Option<OffsetDateTime>,
    pub blocking_after: Option<OffsetDateTime>,
}
