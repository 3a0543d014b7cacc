use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;
use std::process::Command;

/// The per-(policy, environment) check invocation boundary.
///
/// An empty violation list is a pass, a non-empty list is a fail, and `Err`
/// is an invocation error — the caller records it as `ERROR`, never `FAIL`.
/// Violation messages are opaque and relayed verbatim into the report.
pub trait CheckBackend: Sync {
    fn evaluate(&self, check_artifact: &Utf8Path, manifest: &[u8]) -> anyhow::Result<Vec<String>>;
}

/// Runs `opa eval` against one check artifact with the manifest as input.
///
/// The manifest is written to a temp file because `opa` reads `--input`
/// from disk. No retry on failure; transient backend trouble surfaces as a
/// per-policy `ERROR` upstream.
pub struct OpaBackend {
    policies_root: Utf8PathBuf,
}

const OPA_QUERY: &str = "data.kustomization.deny";

impl OpaBackend {
    pub fn new(policies_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            policies_root: policies_root.into(),
        }
    }
}

impl CheckBackend for OpaBackend {
    fn evaluate(&self, check_artifact: &Utf8Path, manifest: &[u8]) -> anyhow::Result<Vec<String>> {
        let mut input = tempfile::Builder::new()
            .prefix("manifest-")
            .suffix(".yaml")
            .tempfile()
            .context("create temp manifest file")?;
        input
            .write_all(manifest)
            .and_then(|()| input.flush())
            .context("write manifest to temp file")?;

        let artifact_path = self.policies_root.join(check_artifact);
        let output = Command::new("opa")
            .arg("eval")
            .arg("--data")
            .arg(artifact_path.as_str())
            .arg("--input")
            .arg(input.path())
            .args(["--format", "json"])
            .arg(OPA_QUERY)
            .output()
            .context("spawn opa")?;

        if !output.status.success() {
            anyhow::bail!(
                "opa eval failed for {}: {}\n{}",
                artifact_path,
                output.status,
                String::from_utf8_lossy(&output.stderr),
            );
        }

        parse_deny_set(&output.stdout)
            .with_context(|| format!("parse opa output for {artifact_path}"))
    }
}

/// Extract the deny set from `opa eval --format json` output.
///
/// Shape: `{"result": [{"expressions": [{"value": [<msg>, ...]}]}]}`.
/// Non-string entries in the deny set are skipped rather than failing the
/// whole invocation.
fn parse_deny_set(output: &[u8]) -> anyhow::Result<Vec<String>> {
    #[derive(serde::Deserialize)]
    struct EvalOutput {
        #[serde(default)]
        result: Vec<EvalResult>,
    }
    #[derive(serde::Deserialize)]
    struct EvalResult {
        #[serde(default)]
        expressions: Vec<EvalExpression>,
    }
    #[derive(serde::Deserialize)]
    struct EvalExpression {
        #[serde(default)]
        value: serde_json::Value,
    }

    let parsed: EvalOutput = serde_json::from_slice(output).context("parse opa json output")?;

    let mut violations = Vec::new();
    for result in parsed.result {
        for expression in result.expressions {
            if let serde_json::Value::Array(entries) = expression.value {
                for entry in entries {
                    if let serde_json::Value::String(message) = entry {
                        violations.push(message);
                    }
                }
            }
        }
    }
    Ok(violations)
}
