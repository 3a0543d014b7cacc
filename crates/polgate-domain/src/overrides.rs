use crate::model::PolicySet;
use std::collections::BTreeSet;

/// Resolve which policies the comment history suppresses for this run.
///
/// A policy is overridden when any comment body contains its configured
/// token as a substring; the first match settles it and later comments are
/// not consulted for that policy. Resolution happens once per run and the
/// resulting set applies to every environment.
pub fn resolve_overrides(set: &PolicySet, comments: &[String]) -> BTreeSet<String> {
    let mut overridden = BTreeSet::new();

    for (id, spec) in &set.policies {
        let Some(token) = spec.override_token.as_deref() else {
            continue;
        };
        if comments.iter().any(|body| body.contains(token)) {
            overridden.insert(id.clone());
        }
    }

    overridden
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnforcementSchedule, PolicySpec};

    fn policy(id: &str, token: Option<&str>) -> PolicySpec {
        PolicySpec {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            check_artifact: format!("{id}.rego"),
            override_token: token.map(str::to_string),
            schedule: EnforcementSchedule::default(),
        }
    }

    fn set(policies: Vec<PolicySpec>) -> PolicySet {
        PolicySet {
            policies: policies.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    #[test]
    fn matching_token_overrides_policy() {
        let set = set(vec![policy("ha", Some("/pg-override-ha"))]);
        let comments = vec!["lgtm".to_string(), "please /pg-override-ha for now".to_string()];
        let overrides = resolve_overrides(&set, &comments);
        assert!(overrides.contains("ha"));
    }

    #[test]
    fn policy_without_token_is_never_overridden() {
        let set = set(vec![policy("ha", None)]);
        let comments = vec!["ha".to_string(), "/pg-override-ha".to_string()];
        assert!(resolve_overrides(&set, &comments).is_empty());
    }

    #[test]
    fn no_matching_comment_means_no_override() {
        let set = set(vec![policy("ha", Some("/pg-override-ha"))]);
        let comments = vec!["unrelated chatter".to_string()];
        assert!(resolve_overrides(&set, &comments).is_empty());
    }

    #[test]
    fn resolution_is_idempotent() {
        let set = set(vec![
            policy("ha", Some("/pg-override-ha")),
            policy("tags", Some("/pg-override-tags")),
        ]);
        let comments = vec!["/pg-override-ha".to_string()];
        let first = resolve_overrides(&set, &comments);
        let second = resolve_overrides(&set, &comments);
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn empty_comment_history_overrides_nothing() {
        let set = set(vec![policy("ha", Some("/pg-override-ha"))]);
        assert!(resolve_overrides(&set, &[]).is_empty());
    }
}
