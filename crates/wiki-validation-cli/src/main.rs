// crates/wiki-validation-cli/src/main.rs
// ============================================================================
// Module: Wiki Validation CLI Entry Point
// Description: Command dispatcher for building and running page validation suites.
// Purpose: Run the validation suite from a config file or property overrides.
// Dependencies: clap, thiserror, wiki-validation-config, wiki-validation-core
// ============================================================================

//! ## Overview
//! `wiki-validation` assembles the page validation suite from a TOML config
//! file, `-D key=value` properties, or both, and either runs it (`run`) or
//! prints the case names it would run (`list`). Reports are written as JSON
//! lines; a one-line summary goes to stderr.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs::File;
use std::io::BufWriter;
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
use thiserror::Error;
use wiki_validation_config::CONFIG_ENV_VAR;
use wiki_validation_config::DEFAULT_CONFIG_NAME;
use wiki_validation_config::ValidationConfig;
use wiki_validation_core::LogReportSink;
use wiki_validation_core::Suite;
use wiki_validation_core::SuiteReport;
use wiki_validation_core::Validator;
use wiki_validation_core::WellFormedXmlValidator;
use wiki_validation_core::build_suite;
use wiki_validation_core::validation_test_case;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "wiki-validation", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch and validate every page in the suite.
    Run(RunCommand),
    /// Print the suite's case names without fetching anything.
    List(ListCommand),
}

/// Config sources shared by every subcommand.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Optional config file path (defaults to wiki-validation.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Property override such as `-D urlsToTestAsAdmin=/xwiki/bin/view/Main/`.
    #[arg(
        short = 'D',
        value_name = "KEY=VALUE",
        value_parser = parse_property,
        action = ArgAction::Append
    )]
    properties: Vec<(String, String)>,
}

/// Arguments for the `run` command.
#[derive(Args, Debug)]
struct RunCommand {
    /// Config sources.
    #[command(flatten)]
    config: ConfigArgs,
    /// Write JSON-lines case reports to this file instead of stdout.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

/// Arguments for the `list` command.
#[derive(Args, Debug)]
struct ListCommand {
    /// Config sources.
    #[command(flatten)]
    config: ConfigArgs,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
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
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("wiki-validation {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Run(command) => command_run(&command),
        Commands::List(command) => command_list(&command),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `run` command.
fn command_run(command: &RunCommand) -> CliResult<ExitCode> {
    let suite = load_suite(&command.config)?;
    let writer: Box<dyn Write + Send> = match &command.report {
        Some(path) => {
            let file = File::create(path).map_err(|err| {
                CliError::new(format!("cannot create report {}: {err}", path.display()))
            })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(std::io::stdout()),
    };
    let sink = LogReportSink::new(writer);
    let report = suite.run(&sink).map_err(|err| CliError::new(err.to_string()))?;
    write_stderr_line(&summary_line(&report))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    Ok(if report.all_passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Executes the `list` command.
fn command_list(command: &ListCommand) -> CliResult<ExitCode> {
    let suite = load_suite(&command.config)?;
    for name in suite.names() {
        write_stdout_line(name).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help().to_string();
    write_stdout_line(help.trim_end()).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Suite Loading
// ============================================================================

/// Resolves configuration and builds the suite with the default validator.
fn load_suite(args: &ConfigArgs) -> CliResult<Suite> {
    let config = resolve_config(args)?;
    let validator = || -> Arc<dyn Validator> { Arc::new(WellFormedXmlValidator::new()) };
    build_suite(&config, validator, validation_test_case)
        .map_err(|err| CliError::new(err.to_string()))
}

/// Loads the config file when one is available, then applies properties.
///
/// Without an explicit path, env override, or default file, the properties
/// alone must describe the suite.
fn resolve_config(args: &ConfigArgs) -> CliResult<ValidationConfig> {
    let properties = property_map(&args.properties);
    let has_file = args.config.is_some()
        || env::var_os(CONFIG_ENV_VAR).is_some()
        || Path::new(DEFAULT_CONFIG_NAME).is_file();
    if !has_file {
        return ValidationConfig::from_properties(&properties)
            .map_err(|err| CliError::new(err.to_string()));
    }
    let mut config = ValidationConfig::load(args.config.as_deref())
        .map_err(|err| CliError::new(err.to_string()))?;
    if !properties.is_empty() {
        config.apply_properties(&properties).map_err(|err| CliError::new(err.to_string()))?;
    }
    Ok(config)
}

/// Collects `-D` pairs; later values win.
fn property_map(pairs: &[(String, String)]) -> BTreeMap<String, String> {
    pairs.iter().cloned().collect()
}

/// Parses a `KEY=VALUE` property argument.
fn parse_property(raw: &str) -> Result<(String, String), String> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(format!("expected KEY=VALUE, got `{raw}`"));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err("property key must not be empty".to_string());
    }
    Ok((key.to_string(), value.to_string()))
}

/// Formats the run summary.
fn summary_line(report: &SuiteReport) -> String {
    format!(
        "{} passed, {} failed, {} total",
        report.passed_count(),
        report.failed_count(),
        report.cases.len()
    )
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
