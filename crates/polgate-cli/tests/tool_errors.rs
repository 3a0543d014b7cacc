//! Tool-error paths: anything that prevents producing a verdict must exit 2
//! before any check subprocess is spawned.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn polgate_cmd() -> Command {
    Command::cargo_bin("polgate").unwrap()
}

const VALID_CONFIG: &str = r#"
policies:
  ha:
    name: Service HA
    description: Workloads must run at least two replicas
    checkType: opa
    checkArtifactPath: ha.rego
    enforcement:
      inEffectAfter: 2025-01-01T00:00:00Z
      blockingAfter: 2025-06-01T00:00:00Z
      override:
        commentToken: /pg-override-ha
"#;

fn write_policies(dir: &TempDir, config: &str) {
    fs::write(dir.path().join("compliance-config.yaml"), config).unwrap();
    fs::write(dir.path().join("ha.rego"), "package kustomization\n").unwrap();
    fs::write(dir.path().join("ha_test.rego"), "package kustomization\n").unwrap();
}

#[test]
fn missing_config_exits_2() {
    let policies = TempDir::new().unwrap();
    let manifests = TempDir::new().unwrap();

    polgate_cmd()
        .arg("local")
        .args(["--service", "my-app"])
        .args(["--environments", "stg"])
        .arg("--policies-path")
        .arg(policies.path())
        .arg("--manifests-dir")
        .arg(manifests.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("polgate error"));
}

#[test]
fn schedule_order_violation_exits_2() {
    let policies = TempDir::new().unwrap();
    let manifests = TempDir::new().unwrap();
    let config = r#"
policies:
  ha:
    name: Service HA
    checkType: opa
    checkArtifactPath: ha.rego
    enforcement:
      inEffectAfter: 2025-06-01T00:00:00Z
      warningAfter: 2025-01-01T00:00:00Z
"#;
    write_policies(&policies, config);
    fs::write(manifests.path().join("stg.yaml"), "kind: Deployment\n").unwrap();

    polgate_cmd()
        .arg("local")
        .args(["--service", "my-app"])
        .args(["--environments", "stg"])
        .arg("--policies-path")
        .arg(policies.path())
        .arg("--manifests-dir")
        .arg(manifests.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("polgate error"));
}

#[test]
fn missing_check_artifact_exits_2() {
    let policies = TempDir::new().unwrap();
    let manifests = TempDir::new().unwrap();
    fs::write(policies.path().join("compliance-config.yaml"), VALID_CONFIG).unwrap();
    fs::write(manifests.path().join("stg.yaml"), "kind: Deployment\n").unwrap();

    polgate_cmd()
        .arg("local")
        .args(["--service", "my-app"])
        .args(["--environments", "stg"])
        .arg("--policies-path")
        .arg(policies.path())
        .arg("--manifests-dir")
        .arg(manifests.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("polgate error"));
}

#[test]
fn missing_manifest_exits_2() {
    let policies = TempDir::new().unwrap();
    let manifests = TempDir::new().unwrap();
    write_policies(&policies, VALID_CONFIG);

    polgate_cmd()
        .arg("local")
        .args(["--service", "my-app"])
        .args(["--environments", "stg,prod"])
        .arg("--policies-path")
        .arg(policies.path())
        .arg("--manifests-dir")
        .arg(manifests.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("manifest"));
}

#[test]
fn invalid_now_exits_2() {
    let policies = TempDir::new().unwrap();
    let manifests = TempDir::new().unwrap();
    write_policies(&policies, VALID_CONFIG);
    fs::write(manifests.path().join("stg.yaml"), "kind: Deployment\n").unwrap();

    polgate_cmd()
        .arg("local")
        .args(["--service", "my-app"])
        .args(["--environments", "stg"])
        .args(["--now", "yesterday"])
        .arg("--policies-path")
        .arg(policies.path())
        .arg("--manifests-dir")
        .arg(manifests.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("RFC 3339"));
}

#[test]
fn github_mode_requires_gh_token() {
    let policies = TempDir::new().unwrap();
    let manifests = TempDir::new().unwrap();
    write_policies(&policies, VALID_CONFIG);
    fs::write(manifests.path().join("stg.yaml"), "kind: Deployment\n").unwrap();

    polgate_cmd()
        .env_remove("GH_TOKEN")
        .arg("github")
        .args(["--service", "my-app"])
        .args(["--environments", "stg"])
        .args(["--repo", "acme/my-app"])
        .args(["--pr-number", "17"])
        .arg("--policies-path")
        .arg(policies.path())
        .arg("--manifests-dir")
        .arg(manifests.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("GH_TOKEN"));
}
