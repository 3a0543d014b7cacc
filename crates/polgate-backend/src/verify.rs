use camino::Utf8Path;
use polgate_domain::model::PolicySet;
use polgate_settings::ConfigError;

/// Verify that every policy's check artifact and its `_test.rego`
/// companion exist under the policies root. The tool refuses to trust a
/// policy that ships no self-test. Fatal before any evaluation.
pub fn verify_artifacts(set: &PolicySet, policies_root: &Utf8Path) -> Result<(), ConfigError> {
    for (id, spec) in &set.policies {
        let artifact = policies_root.join(&spec.check_artifact);
        if !artifact.is_file() {
            return Err(ConfigError::MissingCheckArtifact {
                id: id.clone(),
                path: artifact.to_string(),
            });
        }

        let Some(stem) = spec.check_artifact.strip_suffix(".rego") else {
            return Err(ConfigError::UnsupportedArtifactExtension {
                id: id.clone(),
                path: spec.check_artifact.clone(),
            });
        };

        let test_artifact = policies_root.join(format!("{stem}_test.rego"));
        if !test_artifact.is_file() {
            return Err(ConfigError::MissingTestArtifact {
                id: id.clone(),
                path: test_artifact.to_string(),
            });
        }
    }
    Ok(())
}
