//! CLI entry point for polgate.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and
//! exit codes. Evaluation lives in the `polgate-app` crate.
//!
//! Exit contract: 0 when every enforced check passed, 1 when the decision
//! is to block or warn, 2 on tool errors (bad config, unreadable manifests,
//! a backend that fails for every invocation).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use polgate_app::{decision_exit_code, run, write_report, write_text, CancelFlag, EnvironmentManifest, RunInput};
use polgate_backend::{
    verify_artifacts, CommentSource, GithubCommentSource, OpaBackend, StaticComments,
};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const CONFIG_FILE: &str = "compliance-config.yaml";

#[derive(Parser, Debug)]
#[command(
    name = "polgate",
    version,
    about = "Policy compliance gate for rendered Kubernetes manifests"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Service under evaluation; recorded in the report envelope.
    #[arg(long)]
    service: String,

    /// Comma-delimited environment names; report order follows this order.
    #[arg(long, value_delimiter = ',', required = true)]
    environments: Vec<String>,

    /// Directory containing compliance-config.yaml and the check artifacts.
    #[arg(long, default_value = "./policies")]
    policies_path: Utf8PathBuf,

    /// Directory containing one rendered `<environment>.yaml` per environment.
    #[arg(long, default_value = ".")]
    manifests_dir: Utf8PathBuf,

    /// Where report artifacts are written.
    #[arg(long, default_value = "artifacts/polgate")]
    output_dir: Utf8PathBuf,

    /// Also write the machine-readable JSON report.
    #[arg(long)]
    export_report: bool,

    /// Evaluation instant as RFC 3339 (defaults to the current time).
    #[arg(long)]
    now: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate locally, with override comments supplied on the command line.
    Local {
        #[command(flatten)]
        common: CommonArgs,

        /// Comment body to match override tokens against (repeatable).
        #[arg(long = "comment")]
        comments: Vec<String>,
    },

    /// Evaluate against a GitHub pull request's comment history.
    Github {
        #[command(flatten)]
        common: CommonArgs,

        /// Repository in `owner/name` form.
        #[arg(long)]
        repo: String,

        /// Pull request number whose comments carry override tokens.
        #[arg(long)]
        pr_number: u64,

        /// Base commit recorded in the report envelope.
        #[arg(long)]
        base_commit: Option<String>,

        /// Head commit recorded in the report envelope.
        #[arg(long)]
        head_commit: Option<String>,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match run_command(cli.cmd) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(err) => {
            eprintln!("polgate error: {err:#}");
            std::process::exit(2);
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("POLGATE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("polgate=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_command(cmd: Commands) -> anyhow::Result<i32> {
    match cmd {
        Commands::Local { common, comments } => {
            let source = StaticComments::new(comments);
            evaluate(common, &source, None, None)
        }
        Commands::Github {
            common,
            repo,
            pr_number,
            base_commit,
            head_commit,
        } => {
            let token = std::env::var("GH_TOKEN")
                .context("GH_TOKEN must be set for github mode")?;
            let source = GithubCommentSource::new(repo, pr_number, token);
            evaluate(common, &source, base_commit, head_commit)
        }
    }
}

fn evaluate(
    args: CommonArgs,
    comments: &dyn CommentSource,
    base_commit: Option<String>,
    head_commit: Option<String>,
) -> anyhow::Result<i32> {
    let config_path = args.policies_path.join(CONFIG_FILE);
    let config_text = std::fs::read_to_string(&config_path)
        .with_context(|| format!("reading {config_path}"))?;
    let set = polgate_settings::load_policy_set(&config_text)
        .with_context(|| format!("loading {config_path}"))?;
    verify_artifacts(&set, &args.policies_path).context("verifying check artifacts")?;

    // Manifests are read up front so a missing file fails before any check
    // subprocess is spawned.
    let environments = read_manifests(&args.manifests_dir, &args.environments)?;

    let now = match &args.now {
        Some(raw) => OffsetDateTime::parse(raw, &Rfc3339)
            .with_context(|| format!("parsing --now value {raw:?} as RFC 3339"))?,
        None => OffsetDateTime::now_utc(),
    };

    let backend = OpaBackend::new(args.policies_path.clone());
    let envelope = run(RunInput {
        service: args.service,
        base_commit,
        head_commit,
        environments,
        set,
        backend: &backend,
        comments,
        now,
        cancel: CancelFlag::default(),
    })?;

    let markdown = polgate_render::render_markdown(&envelope);
    write_text(&args.output_dir.join("report.md"), &markdown)?;
    if args.export_report {
        write_report(&envelope, &args.output_dir.join("report.json"))?;
    }

    println!("{}", envelope.report.decision.summary);
    Ok(decision_exit_code(&envelope.report.decision))
}

fn read_manifests(dir: &Utf8Path, names: &[String]) -> anyhow::Result<Vec<EnvironmentManifest>> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(format!("{name}.yaml"));
            let manifest = std::fs::read(&path)
                .with_context(|| format!("reading manifest {path} for environment {name}"))?;
            Ok(EnvironmentManifest {
                name: name.clone(),
                manifest,
            })
        })
        .collect()
}
