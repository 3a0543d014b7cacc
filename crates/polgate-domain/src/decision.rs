use polgate_types::{EnforcementDecision, EnvironmentSummary};

/// Derive the final verdict from the completed per-environment summaries.
///
/// Callers must pass summaries for every requested environment; evaluating
/// a partial matrix would let a run pass before its strictest environment
/// has been counted. `should_warn` is suppressed when blocking.
pub fn decide(summaries: &[EnvironmentSummary]) -> EnforcementDecision {
    let blocking: u32 = summaries.iter().map(|s| s.block_failures).sum();
    let warning: u32 = summaries.iter().map(|s| s.warning_failures).sum();

    let should_block = blocking > 0;
    let should_warn = !should_block && warning > 0;

    let summary = if should_block {
        format!("{blocking} blocking policy failure(s)")
    } else if should_warn {
        format!("{warning} warning policy failure(s)")
    } else {
        "All checks passed".to_string()
    };

    EnforcementDecision {
        should_block,
        should_warn,
        summary,
    }
}
