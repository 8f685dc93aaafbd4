//! cmake-formatter - run cmake-format over CMake files from the terminal

rust_i18n::i18n!("locales", fallback = "en");

mod files;
mod host;
mod locale;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use cmake_formatter_core::{FormatCoordinator, FormatOutcome, LogLevel, MemorySettings, Settings};
use colored::Colorize;
use rust_i18n::t;
use similar::TextDiff;

use crate::host::{ChangedDocument, SaveMode, TerminalHost};
use crate::settings::Overrides;

#[derive(Parser, Debug)]
#[command(name = "cmake-formatter", version, about = "Format CMake files with cmake-format")]
struct Cli {
    /// Language for messages (en, es, zh-CN)
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Format CMakeLists.txt and *.cmake files
    Format(FormatArgs),
    /// Print the JSON schema of the settings file
    Schema,
}

#[derive(Args, Debug)]
struct FormatArgs {
    /// Files or directories to format
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Report files that would change without writing them
    #[arg(long)]
    check: bool,

    /// Settings file (defaults to the nearest .cmake-formatter.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Path to the cmake-format executable
    #[arg(long, value_name = "PATH")]
    executable: Option<PathBuf>,

    /// Expected `cmake-format --version` output
    #[arg(long, value_name = "VERSION")]
    needed_version: Option<String>,

    /// Verbosity of formatter log lines (error, warn, info)
    #[arg(long, value_parser = parse_log_level)]
    log_level: Option<LogLevel>,

    /// Extra arguments passed to cmake-format before the file path
    #[arg(last = true, value_name = "FORMATTER_ARGS")]
    formatter_args: Vec<String>,
}

fn parse_log_level(value: &str) -> Result<LogLevel, String> {
    LogLevel::parse(value).ok_or_else(|| format!("expected error, warn or info, got '{value}'"))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();
    locale::init(cli.locale.as_deref());

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e:#}", t!("cli.error_label").red().bold());
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Format(args) => run_format(args).await,
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&Settings::json_schema())?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_format(args: FormatArgs) -> anyhow::Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let overrides = Overrides {
        executable: args.executable,
        needed_version: args.needed_version,
        log_level: args.log_level,
        arguments: args.formatter_args,
    };
    let settings = settings::resolve(args.config.as_deref(), &cwd, &overrides)?;

    let files = files::collect_files(&args.paths)?;
    if files.is_empty() {
        eprintln!("{}", t!("cli.no_files"));
        return Ok(ExitCode::SUCCESS);
    }

    let mode = if args.check {
        SaveMode::Check
    } else {
        SaveMode::Write
    };
    let host = Arc::new(TerminalHost::new(mode));
    let coordinator = FormatCoordinator::new(host.clone(), Arc::new(MemorySettings::new(settings)));

    let mut failed = 0usize;
    for file in &files {
        match coordinator.format_document(file, true).await {
            FormatOutcome::Formatted => {}
            FormatOutcome::Failed(e) => {
                tracing::debug!("{}: {e}", file.display());
                failed += 1;
            }
            FormatOutcome::Skipped => {
                tracing::warn!("Skipped {} while another format was running", file.display());
                failed += 1;
            }
        }
    }

    let changed = host.changed();
    let unchanged = files.len().saturating_sub(failed + changed.len());

    if args.check {
        for document in &changed {
            println!("{}", t!("cli.would_reformat", path = document.path.display()).bold());
            print_diff(document);
        }
        if !changed.is_empty() {
            eprintln!("{}", t!("cli.check_summary", count = changed.len()));
        }
    } else if !changed.is_empty() {
        eprintln!("{}", t!("cli.formatted", count = changed.len()).green());
    }
    if unchanged > 0 {
        eprintln!("{}", t!("cli.unchanged", count = unchanged));
    }
    if failed > 0 {
        eprintln!("{}", t!("cli.failed_summary", count = failed).red());
    }

    let would_change = args.check && !changed.is_empty();
    if failed > 0 || would_change {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_diff(document: &ChangedDocument) {
    let name = document.path.display().to_string();
    let diff = TextDiff::from_lines(&document.original, &document.formatted);
    let rendered = diff
        .unified_diff()
        .context_radius(3)
        .header(&name, &name)
        .to_string();

    for line in rendered.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else {
            println!("{line}");
        }
    }
}
