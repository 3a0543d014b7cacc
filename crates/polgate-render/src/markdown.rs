use polgate_types::{
    EnforcementLevel, OutcomeStatus, PolicyRow, ReportEnvelope,
};

pub fn render_markdown(envelope: &ReportEnvelope) -> String {
    let report = &envelope.report;
    let mut out = String::new();

    out.push_str(&format!("# Policy compliance report: {}\n\n", envelope.service));

    let decision = if report.decision.should_block {
        "BLOCK"
    } else if report.decision.should_warn {
        "WARN"
    } else {
        "PASS"
    };
    out.push_str(&format!(
        "- Decision: **{}**\n- {}\n\n",
        decision, report.decision.summary
    ));

    out.push_str("## Environments\n\n");
    out.push_str("| Environment | Passed | Failed | Errored | Omitted |\n");
    out.push_str("|---|---|---|---|---|\n");
    for s in &report.summaries {
        out.push_str(&format!(
            "| `{}` | {} | {} | {} | {} |\n",
            s.environment, s.passed, s.failed, s.errored, s.omitted
        ));
    }
    out.push('\n');

    render_failure_group(&mut out, report, "Blocking failures", EnforcementLevel::Block);
    render_failure_group(&mut out, report, "Warning failures", EnforcementLevel::Warning);
    render_failure_group(
        &mut out,
        report,
        "Recommend failures",
        EnforcementLevel::Recommend,
    );
    render_omitted_group(&mut out, report);
    render_errors(&mut out, report);

    out
}

fn is_enforced_failure(row: &PolicyRow, level: EnforcementLevel) -> bool {
    row.level == level
        && !row.overridden
        && row
            .outcomes
            .values()
            .any(|cell| cell.status == OutcomeStatus::Fail)
}

fn render_failure_group(
    out: &mut String,
    report: &polgate_types::ComplianceReport,
    title: &str,
    level: EnforcementLevel,
) {
    let rows: Vec<&PolicyRow> = report
        .policies
        .iter()
        .filter(|row| is_enforced_failure(row, level))
        .collect();
    if rows.is_empty() {
        return;
    }

    out.push_str(&format!("## {title}\n\n"));
    for row in rows {
        render_row(out, report, row);
    }
    out.push('\n');
}

/// Failures that are visible but excluded from enforcement: overridden, or
/// the policy is not yet in effect.
fn render_omitted_group(out: &mut String, report: &polgate_types::ComplianceReport) {
    let rows: Vec<&PolicyRow> = report
        .policies
        .iter()
        .filter(|row| {
            (row.overridden || row.level == EnforcementLevel::NotInEffect)
                && row
                    .outcomes
                    .values()
                    .any(|cell| cell.status == OutcomeStatus::Fail)
        })
        .collect();
    if rows.is_empty() {
        return;
    }

    out.push_str("## Omitted failures (overridden or not in effect)\n\n");
    for row in rows {
        let reason = if row.overridden {
            "overridden"
        } else {
            "not in effect"
        };
        out.push_str(&format!(
            "- **{}** (`{}`, {}): {}\n",
            row.name,
            row.policy_id,
            reason,
            status_line(report, row)
        ));
    }
    out.push('\n');
}

fn render_errors(out: &mut String, report: &polgate_types::ComplianceReport) {
    let mut lines = Vec::new();
    for row in &report.policies {
        for env in &report.environments {
            if let Some(cell) = row.outcomes.get(env) {
                if let Some(error) = &cell.error {
                    lines.push(format!("- `{}` in `{}`: {}", row.policy_id, env, error));
                }
            }
        }
    }
    if lines.is_empty() {
        return;
    }

    out.push_str("## Check errors\n\n");
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');
}

fn render_row(out: &mut String, report: &polgate_types::ComplianceReport, row: &PolicyRow) {
    out.push_str(&format!(
        "- **{}** (`{}`): {}\n",
        row.name,
        row.policy_id,
        status_line(report, row)
    ));
    for env in &report.environments {
        if let Some(cell) = row.outcomes.get(env) {
            for violation in &cell.violations {
                out.push_str(&format!("  - {env}: {violation}\n"));
            }
        }
    }
}

fn status_line(report: &polgate_types::ComplianceReport, row: &PolicyRow) -> String {
    report
        .environments
        .iter()
        .filter_map(|env| {
            row.outcomes
                .get(env)
                .map(|cell| format!("{}: {}", env, cell.status.as_str()))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
