use crate::context::EvaluationContext;
use camino::Utf8Path;
use polgate_backend::{CheckBackend, CommentSource};
use polgate_domain::model::PolicySet;
use polgate_domain::{build_report, ReportInputs};
use polgate_types::{OutcomeStatus, PolicyOutcome, ReportEnvelope, ToolMeta, SCHEMA_REPORT_V1};
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use time::OffsetDateTime;

/// Cooperative cancellation: checked before each check invocation. Once
/// set, the run fails fast and produces no report.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// One pre-rendered manifest per deployment environment.
#[derive(Clone, Debug)]
pub struct EnvironmentManifest {
    pub name: String,
    pub manifest: Vec<u8>,
}

pub struct RunInput<'a> {
    pub service: String,
    pub base_commit: Option<String>,
    pub head_commit: Option<String>,
    /// Requested environment order; the report preserves it.
    pub environments: Vec<EnvironmentManifest>,
    pub set: PolicySet,
    pub backend: &'a dyn CheckBackend,
    pub comments: &'a dyn CommentSource,
    /// The evaluation instant. Injected rather than sampled internally so
    /// runs are reproducible.
    pub now: OffsetDateTime,
    pub cancel: CancelFlag,
}

/// Evaluate every policy against every environment and assemble the report.
///
/// Environments fan out as parallel tasks; the collect below them is the
/// barrier, so a partial matrix never reaches aggregation or the decision.
pub fn run(input: RunInput<'_>) -> anyhow::Result<ReportEnvelope> {
    let started_at = OffsetDateTime::now_utc();

    // Degraded mode: a comment fetch failure costs the override set, not
    // the run.
    let comments = match input.comments.list_comments() {
        Ok(comments) => comments,
        Err(err) => {
            tracing::warn!(
                error = %format!("{err:#}"),
                "comment source unavailable; continuing with an empty override set"
            );
            Vec::new()
        }
    };

    let ctx = EvaluationContext::build(input.set, &comments, input.now);

    let per_env: Vec<Vec<PolicyOutcome>> = input
        .environments
        .par_iter()
        .map(|env| evaluate_environment(&ctx, input.backend, env, &input.cancel))
        .collect::<anyhow::Result<_>>()?;
    let outcomes: Vec<PolicyOutcome> = per_env.into_iter().flatten().collect();

    // Every single invocation erroring means the backend itself is broken;
    // that is a tool error, not a policy verdict.
    if !outcomes.is_empty() && outcomes.iter().all(|o| o.status == OutcomeStatus::Error) {
        anyhow::bail!("all check invocations failed; refusing to produce a policy verdict");
    }

    let environments: Vec<String> = input
        .environments
        .iter()
        .map(|env| env.name.clone())
        .collect();

    let report = build_report(ReportInputs {
        environments: &environments,
        set: &ctx.set,
        levels: &ctx.levels,
        overrides: &ctx.overrides,
        outcomes: &outcomes,
    })?;

    tracing::info!(
        environments = environments.len(),
        policies = ctx.set.len(),
        decision = %report.decision.summary,
        "evaluation complete"
    );

    Ok(ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "polgate".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        service: input.service,
        base_commit: input.base_commit,
        head_commit: input.head_commit,
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        report,
    })
}

/// Evaluate every policy against one environment's manifest.
///
/// Every policy is invoked regardless of its level; a failure of a policy
/// that is not yet in effect still shows up in the report, classified as
/// omitted rather than enforced. Per-policy backend errors are recoverable
/// and recorded as `ERROR` outcomes.
fn evaluate_environment(
    ctx: &EvaluationContext,
    backend: &dyn CheckBackend,
    env: &EnvironmentManifest,
    cancel: &CancelFlag,
) -> anyhow::Result<Vec<PolicyOutcome>> {
    tracing::info!(environment = %env.name, "evaluating policies");

    let mut outcomes = Vec::with_capacity(ctx.set.len());
    for (id, spec) in &ctx.set.policies {
        if cancel.is_cancelled() {
            anyhow::bail!("run cancelled while evaluating environment {}", env.name);
        }

        let artifact = Utf8Path::new(&spec.check_artifact);
        let outcome = match backend.evaluate(artifact, &env.manifest) {
            Ok(violations) if violations.is_empty() => {
                PolicyOutcome::pass(id.clone(), env.name.clone())
            }
            Ok(violations) => PolicyOutcome::fail(id.clone(), env.name.clone(), violations),
            Err(err) => {
                tracing::warn!(
                    policy = %id,
                    environment = %env.name,
                    error = %format!("{err:#}"),
                    "check invocation failed"
                );
                PolicyOutcome::error(id.clone(), env.name.clone(), format!("{err:#}"))
            }
        };
        outcomes.push(outcome);
    }

    Ok(outcomes)
}
