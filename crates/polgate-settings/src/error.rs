/// Fatal configuration errors. Any one of these aborts the whole load;
/// there is no partial success.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse policy config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("no policies defined in policy config")]
    EmptyPolicySet,

    #[error("policy {id}: name is required")]
    MissingName { id: String },

    #[error("policy {id}: unsupported check type {check_type:?} (only \"opa\" is supported)")]
    UnsupportedCheckType { id: String, check_type: String },

    #[error("policy {id}: checkArtifactPath is required")]
    MissingArtifactPath { id: String },

    #[error("policy {id}: {later} cannot be before {earlier}")]
    ScheduleOrder {
        id: String,
        earlier: &'static str,
        later: &'static str,
    },

    #[error("policy {id}: override token must not be empty")]
    EmptyOverrideToken { id: String },

    #[error("policy {id}: override token exceeds {max} characters", max = crate::MAX_OVERRIDE_TOKEN_LEN)]
    OverrideTokenTooLong { id: String },

    #[error("override token {token:?} is shared by policies {first} and {second}")]
    DuplicateOverrideToken {
        token: String,
        first: String,
        second: String,
    },

    #[error("policy {id}: check artifact not found: {path}")]
    MissingCheckArtifact { id: String, path: String },

    #[error("policy {id}: test artifact not found: {path} (every policy must ship a self-test)")]
    MissingTestArtifact { id: String, path: String },

    #[error("policy {id}: unsupported artifact extension: {path} (must be .rego)")]
    UnsupportedArtifactExtension { id: String, path: String },
}
