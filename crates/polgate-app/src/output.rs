use anyhow::Context;
use camino::Utf8Path;
use polgate_types::{EnforcementDecision, ReportEnvelope};

/// Exit code carried by the enforcement decision: 0 when clean, 1 when the
/// run should block or warn. Tool errors (code 2) never reach this point.
pub fn decision_exit_code(decision: &EnforcementDecision) -> i32 {
    if decision.should_block || decision.should_warn {
        1
    } else {
        0
    }
}

pub fn serialize_report(envelope: &ReportEnvelope) -> anyhow::Result<String> {
    let mut body = serde_json::to_string_pretty(envelope).context("serializing report")?;
    body.push('\n');
    Ok(body)
}

pub fn write_report(envelope: &ReportEnvelope, path: &Utf8Path) -> anyhow::Result<()> {
    write_text(path, &serialize_report(envelope)?)
}

pub fn write_text(path: &Utf8Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {parent}"))?;
    }
    std::fs::write(path, contents).with_context(|| format!("writing {path}"))
}
