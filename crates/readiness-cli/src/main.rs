// crates/readiness-cli/src/main.rs
// ============================================================================
// Module: Readiness CLI Entry Point
// Description: Command dispatcher for release readiness validation.
// Purpose: Load config, run every check over snapshot evidence, write reports.
// Dependencies: clap, readiness-adapters, readiness-config, readiness-core, thiserror, tokio
// ============================================================================

//! ## Overview
//! `readiness validate` evaluates a release and writes the report into `--out`.
//! The exit code carries the verdict: `0` GREEN, `1` YELLOW, `2` RED, and `3`
//! for tool failures or an incomplete evaluation. Usage errors also exit `3` so
//! they are never mistaken for a RED verdict.
//! `readiness config check` validates configuration without running checks.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap::error::ErrorKind;
use readiness_adapters::SnapshotConfig;
use readiness_adapters::snapshot_adapters;
use readiness_cli::audit::FileAuditSink;
use readiness_cli::audit::StderrAuditSink;
use readiness_cli::i18n::Locale;
use readiness_cli::i18n::set_locale;
use readiness_cli::report_sink::FileReportSink;
use readiness_cli::report_sink::REPORT_FILE;
use readiness_cli::t;
use readiness_config::AuditConfig;
use readiness_config::ReadinessConfig;
use readiness_core::AuditDetail;
use readiness_core::AuditEvent;
use readiness_core::AuditSink;
use readiness_core::BuildId;
use readiness_core::CheckKind;
use readiness_core::CheckRegistry;
use readiness_core::ExecutionContext;
use readiness_core::NoopAuditSink;
use readiness_core::REASON_EVALUATION_INCOMPLETE;
use readiness_core::ReportSink;
use readiness_core::Runner;
use readiness_core::Timestamp;
use readiness_core::cancellation;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable for CLI locale selection.
const LANG_ENV: &str = "READINESS_LANG";
/// Exit code for tool failures and incomplete evaluations.
const EXIT_TOOL_FAILURE: u8 = 3;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "readiness", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Preferred output language (overrides `READINESS_LANG`).
    #[arg(long, value_enum, value_name = "LANG", global = true)]
    lang: Option<LangArg>,
    /// Selected subcommand.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate release readiness and write the report.
    Validate(ValidateCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Config file path (defaults to readiness.toml or `READINESS_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output directory for the report files.
    #[arg(long, value_name = "DIR")]
    out: PathBuf,
    /// Build identifier stamped on the report (overrides `run.build_id`).
    #[arg(long = "build-id", value_name = "ID")]
    build_id: Option<String>,
    /// Change-management reference (overrides the configured reference).
    #[arg(long = "cm-ref", value_name = "REF")]
    cm_ref: Option<String>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file and its policy.
    Check(ConfigCheckCommand),
}

/// Arguments for `config check`.
#[derive(Args, Debug)]
struct ConfigCheckCommand {
    /// Config file path (defaults to readiness.toml or `READINESS_CONFIG`).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Change-management reference (overrides the configured reference).
    #[arg(long = "cm-ref", value_name = "REF")]
    cm_ref: Option<String>,
}

/// Supported CLI language selections.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum LangArg {
    /// English.
    En,
    /// Catalan.
    Ca,
}

impl From<LangArg> for Locale {
    fn from(value: LangArg) -> Self {
        match value {
            LangArg::En => Self::En,
            LangArg::Ca => Self::Ca,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for localized error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a localized message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return Ok(usage_exit(&err)),
    };
    let env_lang = std::env::var(LANG_ENV).ok();
    let locale = resolve_locale(cli.lang, env_lang.as_deref())?;
    set_locale(locale);
    if locale != Locale::En {
        write_stderr_line(&t!("i18n.disclaimer.machine_translated"))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    }

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&t!("main.version", version = version))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Validate(command) => command_validate(command).await,
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

/// Reports a clap parse outcome; help and version requests succeed.
fn usage_exit(err: &clap::Error) -> ExitCode {
    let _ = err.print();
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::from(EXIT_TOOL_FAILURE),
    }
}

/// Emits the top-level help message.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Validate Command
// ============================================================================

/// Executes `validate`.
async fn command_validate(command: ValidateCommand) -> CliResult<ExitCode> {
    let config = ReadinessConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let policy = config
        .policy(command.cm_ref.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let release = config.release_identity();
    let build_id = resolve_build_id(command.build_id.as_deref(), config.run.build_id.as_deref());
    let audit = open_audit_sink(&config.audit)?;

    let snapshot = SnapshotConfig {
        root: PathBuf::from(&config.evidence.root),
        max_bytes: config.evidence.max_bytes,
        allow_yaml: config.evidence.allow_yaml,
    };
    let adapters =
        snapshot_adapters(&snapshot, config.evidence.argocd_url.clone()).map_err(|err| {
            let path = snapshot.root.display();
            CliError::new(t!("validate.evidence_failed", path = path, error = err))
        })?;

    let ctx = Arc::new(ExecutionContext::new(release, policy, adapters, Timestamp::now()));
    let runner = Runner::new(CheckRegistry::standard(), config.runner_config(), Arc::clone(&audit));
    let (handle, signal) = cancellation();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });
    let report = runner.run(ctx, build_id.clone(), signal).await;
    interrupt.abort();

    let sink = FileReportSink::new(&command.out);
    let receipts = sink.write(&report).map_err(|err| {
        CliError::new(t!("validate.report_failed", path = command.out.display(), error = err))
    })?;
    for receipt in receipts {
        audit.record(&AuditEvent::new(&build_id, AuditDetail::ReportWritten {
            location: receipt.location,
            digest: receipt.digest,
        }));
    }

    let summary = report.summary();
    write_stdout_line(&t!(
        "validate.result",
        status = report.overall_status(),
        service = report.release().service,
        version = report.release().version,
        red = summary.red,
        yellow = summary.yellow,
        green = summary.green
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line(&t!("validate.report_path", path = command.out.join(REPORT_FILE).display()))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;

    if !report.is_complete() {
        let unfinished = report
            .checks()
            .iter()
            .filter(|check| check.reasons().iter().any(|r| r == REASON_EVALUATION_INCOMPLETE))
            .count();
        write_stderr_line(&t!("validate.incomplete", count = unfinished))
            .map_err(|err| CliError::new(output_error("stderr", &err)))?;
        return Ok(ExitCode::from(EXIT_TOOL_FAILURE));
    }
    Ok(ExitCode::from(report.overall_status().exit_code()))
}

/// Resolves the build identifier: flag, then config, then a local stamp.
fn resolve_build_id(flag: Option<&str>, configured: Option<&str>) -> BuildId {
    [flag, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map_or_else(
            || BuildId::new(format!("local-{}", Timestamp::now().as_unix_millis())),
            BuildId::new,
        )
}

/// Opens the audit sink selected by configuration.
fn open_audit_sink(config: &AuditConfig) -> CliResult<Arc<dyn AuditSink>> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &config.path {
        Some(path) => {
            let sink = FileAuditSink::new(Path::new(path)).map_err(|err| {
                CliError::new(t!("validate.audit_failed", path = path, error = err))
            })?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Check(command) => command_config_check(command),
    }
}

/// Executes `config check`.
fn command_config_check(command: &ConfigCheckCommand) -> CliResult<ExitCode> {
    let config = ReadinessConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let policy = config
        .policy(command.cm_ref.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let release = config.release_identity();
    let required = CheckKind::ALL.iter().filter(|kind| policy.is_required(**kind)).count();
    write_stdout_line(&t!(
        "config.check.ok",
        service = release.service,
        version = release.version,
        checks = CheckKind::ALL.len(),
        required = required
    ))
    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Locale
// ============================================================================

/// Resolves the CLI locale from flags or environment.
fn resolve_locale(lang: Option<LangArg>, env_lang: Option<&str>) -> CliResult<Locale> {
    if let Some(lang) = lang {
        return Ok(lang.into());
    }
    if let Some(value) = env_lang {
        return Locale::parse(value).ok_or_else(|| {
            CliError::new(t!("i18n.lang.invalid_env", env = LANG_ENV, value = value))
        });
    }
    Ok(Locale::En)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats a localized output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns the tool-failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::from(EXIT_TOOL_FAILURE)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
