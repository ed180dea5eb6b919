//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use footernotes_core::pipeline::{
    BatchResult, FileOutcome, ProgressReporter, SilentProgress, convert_files,
};
use footernotes_shared::{AppConfig, ConvertOptions, OutputMode, init_config, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// cft: convert inline citations to footnotes.
#[derive(Parser)]
#[command(
    name = "cft",
    version,
    about = "Convert inline ([Title](URL)) citations in Markdown files to footnotes.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Per-file report format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum ReportFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Convert the citations of one or more Markdown files.
    Convert {
        /// Markdown files to convert.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print the converted document instead of writing it back.
        #[arg(long, conflicts_with = "check")]
        stdout: bool,

        /// Write nothing; exit with status 1 if any file has citations to convert.
        #[arg(long)]
        check: bool,

        /// Accepted file extension (repeatable). Defaults to the config value.
        #[arg(long = "extension", value_name = "EXT")]
        extensions: Vec<String>,

        /// Report format: text (default) or json.
        #[arg(long, default_value = "text")]
        report: ReportFormat,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
///
/// Logs go to stderr so `--stdout` output stays clean.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "footernotes=info",
        1 => "footernotes=debug",
        _ => "footernotes=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Convert {
            files,
            stdout,
            check,
            extensions,
            report,
        } => cmd_convert(&files, stdout, check, extensions, &report).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_convert(
    files: &[PathBuf],
    stdout: bool,
    check: bool,
    extensions: Vec<String>,
    report: &ReportFormat,
) -> Result<ExitCode> {
    let config = load_config()?;
    let options = resolve_options(&config, stdout, check, extensions);

    info!(
        files = files.len(),
        output = ?options.output,
        "converting citations"
    );

    // A spinner only makes sense for batches printed as text summaries.
    let show_spinner = files.len() > 1
        && options.output != OutputMode::Stdout
        && matches!(report, ReportFormat::Text);
    let result = if show_spinner {
        convert_files(files, &options, &CliProgress::new()).await
    } else {
        convert_files(files, &options, &SilentProgress).await
    };

    match report {
        ReportFormat::Text => print_text_report(&result, options.output),
        ReportFormat::Json => print_json_report(&result)?,
    }

    let check_failed = options.output == OutputMode::Check && result.changed > 0;
    if result.failed > 0 || check_failed {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Merge config values with CLI flags (flags win).
fn resolve_options(
    config: &AppConfig,
    stdout: bool,
    check: bool,
    extensions: Vec<String>,
) -> ConvertOptions {
    let mut options = ConvertOptions::from(config);
    if stdout {
        options.output = OutputMode::Stdout;
    } else if check {
        options.output = OutputMode::Check;
    }
    if !extensions.is_empty() {
        options.extensions = extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();
    }
    options
}

fn print_text_report(result: &BatchResult, output: OutputMode) {
    for (path, outcome) in &result.files {
        match outcome {
            Ok(outcome) => print_outcome(path, outcome, output),
            Err(e) => eprintln!("Error: {e}"),
        }
    }
}

fn print_outcome(path: &Path, outcome: &FileOutcome, output: OutputMode) {
    match output {
        OutputMode::Stdout => {
            if let Some(text) = &outcome.output {
                print!("{text}");
            }
        }
        OutputMode::Check => {
            if outcome.changed {
                println!(
                    "{}: {} citation(s) to convert",
                    path.display(),
                    outcome.citations_replaced
                );
            }
        }
        OutputMode::InPlace => {
            if outcome.written {
                println!(
                    "Successfully converted citations to footnotes: {}",
                    path.display()
                );
            } else {
                println!("No citations to convert: {}", path.display());
            }
        }
    }
}

fn print_json_report(result: &BatchResult) -> Result<()> {
    let mut entries = Vec::with_capacity(result.files.len());
    for (path, outcome) in &result.files {
        let entry = match outcome {
            Ok(outcome) => serde_json::json!({
                "ok": true,
                "outcome": serde_json::to_value(outcome)?,
            }),
            Err(e) => serde_json::json!({
                "ok": false,
                "path": path.display().to_string(),
                "error": e.to_string(),
            }),
        };
        entries.push(entry);
    }

    let report = serde_json::json!({
        "files": entries,
        "changed": result.changed,
        "failed": result.failed,
        "elapsed_ms": result.elapsed.as_millis() as u64,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn file_started(&self, path: &Path, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Converting [{current}/{total}] {}", path.display()));
    }

    fn file_finished(&self, _outcome: &FileOutcome) {}

    fn done(&self, _result: &BatchResult) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<ExitCode> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(ExitCode::SUCCESS)
}

async fn cmd_config_show() -> Result<ExitCode> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(ExitCode::SUCCESS)
}
