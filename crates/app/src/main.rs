//! Combat Probe - Main Entry Point
//!
//! Runs the D&D Combat API contract suite (or a suite file) and exits
//! non-zero when any case fails.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use combat_probe_application::{CancellationToken, CombatSuiteOptions, RunSuite, combat_suite};
use combat_probe_domain::{FieldCasing, ProbeSettings, TestSuite, UnknownMonsterStatus};
use combat_probe_infrastructure::{
    ConsoleReporter, JsonReporter, MultiReporter, ReqwestHttpClient, SuiteFile, SystemClock,
    TestRunner, load_settings,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Contract tests for the D&D Combat API.
#[derive(Debug, Parser)]
#[command(name = "combat-probe", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Settings file (TOML, YAML or JSON).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base URL of the API under test.
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Wire spelling of hit points / armor class: camel or snake.
    #[arg(long, global = true)]
    casing: Option<FieldCasing>,

    /// Expected status for unknown monsters: not-found, server-error or either.
    #[arg(long, global = true)]
    unknown_monster_status: Option<UnknownMonsterStatus>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the suite (default).
    Run(RunArgs),
    /// List the cases without sending any request.
    List(SelectArgs),
    /// Write the built-in suite to a YAML or JSON file.
    Export(ExportArgs),
}

#[derive(Debug, Default, Args)]
struct SelectArgs {
    /// Suite file to use instead of the built-in suite.
    #[arg(long, value_name = "FILE")]
    suite: Option<PathBuf>,

    /// Only run cases in this group (repeatable).
    #[arg(long = "group", value_name = "GROUP")]
    groups: Vec<String>,
}

#[derive(Debug, Default, Args)]
struct RunArgs {
    #[command(flatten)]
    select: SelectArgs,

    /// Also write the results as JSON to this file.
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Skip remaining cases after the first failure.
    #[arg(long)]
    stop_on_failure: bool,
}

#[derive(Debug, Args)]
struct ExportArgs {
    /// Destination file; the extension picks the format.
    #[arg(long, short, value_name = "FILE")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            report_error(&mut io::stderr().lock(), &e);
            ExitCode::from(2)
        }
    }
}

fn report_error(out: &mut impl Write, error: &anyhow::Error) {
    let _ = writeln!(out, "error: {error:#}");
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = resolve_settings(&cli.global)?;

    match cli.command.unwrap_or_else(|| Command::Run(RunArgs::default())) {
        Command::Run(args) => run_suite(settings, args).await,
        Command::List(args) => list_cases(&settings, &args).await,
        Command::Export(args) => export_suite(&settings, &args).await,
    }
}

/// Loads file and environment settings, applies CLI flags, then validates
/// the merged result.
fn resolve_settings(global: &GlobalArgs) -> Result<ProbeSettings> {
    let mut settings = load_settings(global.config.as_deref()).context("loading settings")?;
    apply_overrides(&mut settings, global);
    settings.validate().context("invalid settings")?;
    Ok(settings)
}

fn apply_overrides(settings: &mut ProbeSettings, global: &GlobalArgs) {
    if let Some(base_url) = &global.base_url {
        settings.base_url.clone_from(base_url);
    }
    if let Some(timeout_ms) = global.timeout_ms {
        settings.timeout_ms = timeout_ms;
    }
    if let Some(casing) = global.casing {
        settings.field_casing = casing;
    }
    if let Some(status) = global.unknown_monster_status {
        settings.unknown_monster_status = status;
    }
}

async fn select_suite(settings: &ProbeSettings, args: &SelectArgs) -> Result<TestSuite> {
    let suite = match &args.suite {
        Some(path) => SuiteFile::load(path)
            .await
            .with_context(|| format!("loading suite {}", path.display()))?,
        None => combat_suite(&CombatSuiteOptions::from(settings)),
    };
    Ok(suite.filter_groups(&args.groups))
}

async fn run_suite(mut settings: ProbeSettings, args: RunArgs) -> Result<ExitCode> {
    if args.stop_on_failure {
        settings.stop_on_failure = true;
    }
    if args.report.is_some() {
        settings.report_path = args.report;
    }

    let suite = select_suite(&settings, &args.select).await?;

    let client = ReqwestHttpClient::new(&settings.user_agent).context("creating HTTP client")?;
    let runner = RunSuite::new(Arc::new(client), TestRunner::new(), SystemClock::new())
        .with_default_timeout_ms(settings.timeout_ms)
        .with_stop_on_failure(settings.stop_on_failure);

    let mut reporter = MultiReporter::new().with(ConsoleReporter::new(io::stdout()));
    if let Some(path) = &settings.report_path {
        reporter = reporter.with(JsonReporter::new(path));
    }

    let token = CancellationToken::new();
    let on_interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling run");
            on_interrupt.cancel();
        }
    });

    let results = runner
        .run(&suite, &settings.base_url, &mut reporter, token.receiver())
        .await
        .context("running suite")?;

    Ok(if results.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn list_cases(settings: &ProbeSettings, args: &SelectArgs) -> Result<ExitCode> {
    let suite = select_suite(settings, args).await?;
    let mut out = io::stdout().lock();
    writeln!(out, "{} ({} cases)", suite.name, suite.len())?;
    for case in &suite.cases {
        writeln!(
            out,
            "  [{}] {} {} - {}",
            case.group, case.request.method, case.request.path, case.name
        )?;
    }
    Ok(ExitCode::SUCCESS)
}

async fn export_suite(settings: &ProbeSettings, args: &ExportArgs) -> Result<ExitCode> {
    let suite = combat_suite(&CombatSuiteOptions::from(settings));
    SuiteFile::save(&args.output, &suite)
        .await
        .with_context(|| format!("writing {}", args.output.display()))?;
    tracing::info!(path = %args.output.display(), cases = suite.len(), "exported suite");
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "combat-probe",
            "run",
            "--group",
            "monsters",
            "--group",
            "battles",
            "--base-url",
            "http://localhost:3000",
            "--casing",
            "snake",
            "--unknown-monster-status",
            "404",
        ])
        .unwrap();

        let mut settings = ProbeSettings::default();
        apply_overrides(&mut settings, &cli.global);
        assert_eq!(settings.base_url, "http://localhost:3000");
        assert_eq!(settings.field_casing, FieldCasing::Snake);
        assert_eq!(settings.unknown_monster_status, UnknownMonsterStatus::NotFound);

        match cli.command {
            Some(Command::Run(args)) => assert_eq!(args.select.groups, vec!["monsters", "battles"]),
            other => unreachable!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["combat-probe"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_rejects_unknown_casing() {
        assert!(Cli::try_parse_from(["combat-probe", "--casing", "kebab"]).is_err());
    }

    fn global_args(args: &[&str]) -> GlobalArgs {
        Cli::try_parse_from(std::iter::once("combat-probe").chain(args.iter().copied()))
            .unwrap()
            .global
    }

    #[test]
    fn test_cli_flag_corrects_file_setting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "timeout_ms = 0\nbase_url = \"localhost:3000\"\n").unwrap();
        let config = path.to_str().unwrap();

        let settings = resolve_settings(&global_args(&[
            "--config",
            config,
            "--timeout-ms",
            "5000",
            "--base-url",
            "http://127.0.0.1:9",
        ]))
        .unwrap();
        assert_eq!(settings.timeout_ms, 5000);
        assert_eq!(settings.base_url, "http://127.0.0.1:9");

        let err = resolve_settings(&global_args(&[
            "--config",
            config,
            "--base-url",
            "http://127.0.0.1:9",
        ]))
        .unwrap_err();
        let message = format!("{err:#}");
        assert_eq!(message.matches("must be greater than zero").count(), 1);
    }

    #[test]
    fn test_setup_error_is_written_once() {
        let error = anyhow::anyhow!("disk full").context("writing report");
        let mut out = Vec::new();
        report_error(&mut out, &error);
        assert_eq!(String::from_utf8(out).unwrap(), "error: writing report: disk full\n");
    }

    #[tokio::test]
    async fn test_select_builtin_suite_by_group() {
        let args = SelectArgs {
            suite: None,
            groups: vec!["example".to_string()],
        };
        let suite = select_suite(&ProbeSettings::default(), &args).await.unwrap();
        assert_eq!(suite.len(), 1);
        assert_eq!(suite.cases[0].request.path, "/api/characters/example");
    }
}
