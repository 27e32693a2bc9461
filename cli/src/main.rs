//! CLI for org-code-audit.
//!
//! Scans every repository of a GitHub organization for files matching glob
//! patterns, optionally filtered by line content, and writes a CSV or JSON
//! report.

use clap::Parser;
use org_code_audit::report::DEFAULT_OUTPUT_FILE;
use org_code_audit::{
    resolve_output_path, write_report, AuditFile, ConfigError, ReportError, ReportFormat,
    RepoSelection, RunStatus, Runner, RunnerConfig, RunnerError, ScanConfig, ScanResult,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Inclusion list read when none is configured.
const DEFAULT_INCLUSIONS_FILE: &str = "inclusions/repos.csv";

/// Exclusion list read when none is configured.
const DEFAULT_EXCLUSIONS_FILE: &str = "exclusions/repos.csv";

/// Org Code Audit - Find files and content across every repository of a GitHub organization.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File glob patterns, comma separated (e.g. "*.tf,.github/workflows/*.yml").
    #[arg(short, long = "pattern", value_delimiter = ',')]
    patterns: Vec<String>,

    /// Text to search for inside matching files, comma separated.
    #[arg(short, long = "contents", value_delimiter = ',')]
    contents: Vec<String>,

    /// GitHub organization to scan.
    #[arg(long, env = "GH_ORG")]
    org: Option<String>,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Report file. Relative paths are written under `reports/`.
    #[arg(short, long, env = "OUTPUT_FILE")]
    output: Option<PathBuf>,

    /// Report format (`csv` or `json`). Inferred from the output extension when omitted.
    #[arg(long)]
    format: Option<String>,

    /// Branch to scan instead of each repository's default branch.
    #[arg(short, long)]
    branch: Option<String>,

    /// Maximum number of repositories to scan.
    #[arg(long)]
    limit: Option<usize>,

    /// Number of repositories scanned at once.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Seconds allowed for a single clone.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,

    /// Keep cloned repositories after scanning.
    #[arg(long)]
    keep_clones: bool,

    /// Directory in which repositories are cloned.
    #[arg(long)]
    clone_root: Option<PathBuf>,

    /// Repositories to scan, one per line.
    #[arg(long, env = "INCLUSIONS_FILE")]
    inclusions_file: Option<PathBuf>,

    /// Repositories to skip, one per line.
    #[arg(long, env = "EXCLUSIONS_FILE")]
    exclusions_file: Option<PathBuf>,

    /// TOML configuration file. Command-line values take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Errors that abort the CLI before or after a run.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Missing {name}: pass {hint}")]
    Missing {
        name: &'static str,
        hint: &'static str,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Run(#[from] RunnerError),

    #[error(transparent)]
    Format(ReportError),

    /// The scan completed but its report could not be written.
    #[error(transparent)]
    Report(ReportError),
}

impl CliError {
    /// Returns the process exit code for this failure.
    fn exit_code(&self) -> u8 {
        match self {
            Self::Report(_) => 4,
            _ => 2,
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug)]
struct Settings {
    runner: RunnerConfig,
    output: PathBuf,
    format: ReportFormat,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.debug);

    // Ignored when a provider is already installed.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    match run(args).await {
        Ok((result, output)) => {
            print_summary(&result, &output);
            ExitCode::from(exit_code(result.status()))
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initializes tracing.
///
/// Uses compact single-line output without module targets. The level comes
/// from `RUST_LOG` (default `info`), or `debug` when `--debug` is passed.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(filter)
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<(ScanResult, PathBuf), CliError> {
    let settings = resolve(args)?;
    let runner = Runner::from_config(settings.runner)?;
    let result = runner.run().await?;
    write_report(&result, settings.format, &settings.output).map_err(CliError::Report)?;
    Ok((result, settings.output))
}

/// Merges arguments with the optional configuration file.
fn resolve(args: Args) -> Result<Settings, CliError> {
    let file = match &args.config {
        Some(path) => AuditFile::load(path)?,
        None => AuditFile::default(),
    };

    let organization = args.org.or(file.organization).ok_or(CliError::Missing {
        name: "organization",
        hint: "--org or set GH_ORG",
    })?;
    let token = args
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or(CliError::Missing {
            name: "GitHub token",
            hint: "--token or set GH_TOKEN",
        })?;

    let file_patterns = prefer_non_empty(args.patterns, file.file_patterns);
    let content_patterns = prefer_non_empty(args.contents, file.content_patterns);
    let scan = ScanConfig::builder()
        .file_patterns(file_patterns)
        .content_patterns(content_patterns)
        .branch(args.branch.or(file.branch))
        .limit(args.limit.or(file.limit))
        .retain_working_copies(args.keep_clones || file.keep_clones)
        .build()?;

    let inclusions = args
        .inclusions_file
        .or(file.inclusions_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INCLUSIONS_FILE));
    let exclusions = args
        .exclusions_file
        .or(file.exclusions_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXCLUSIONS_FILE));
    let selection = RepoSelection::load(&inclusions, &exclusions)?;

    let mut runner = RunnerConfig::new(organization, token, scan)
        .with_selection(selection)
        .with_clone_root(args.clone_root.or(file.clone_root));
    if let Some(concurrency) = args.concurrency.or(file.concurrency) {
        runner = runner.with_concurrency(concurrency);
    }
    if let Some(secs) = args.timeout_secs.or(file.checkout_timeout_secs) {
        runner = runner.with_checkout_timeout(Duration::from_secs(secs));
    }
    runner.validate()?;

    let output = resolve_output_path(
        &args
            .output
            .or(file.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE)),
    );
    let format = match args.format.or(file.format) {
        Some(format) => format.parse::<ReportFormat>().map_err(CliError::Format)?,
        None => ReportFormat::from_path(&output),
    };

    Ok(Settings {
        runner,
        output,
        format,
    })
}

fn prefer_non_empty(primary: Vec<String>, fallback: Vec<String>) -> Vec<String> {
    if primary.iter().any(|p| !p.trim().is_empty()) {
        primary
    } else {
        fallback
    }
}

/// Maps a run status to the process exit code.
fn exit_code(status: RunStatus) -> u8 {
    match status {
        RunStatus::Matched => 0,
        RunStatus::NoMatches => 1,
        RunStatus::Partial => 3,
    }
}

/// Prints the final run summary.
fn print_summary(result: &ScanResult, output: &Path) {
    let summary = result.summary();
    println!("\nSummary:");
    println!("  Repositories scanned: {}", summary.repositories_scanned);
    println!("  Repositories skipped: {}", summary.repositories_skipped);
    println!("  Files matched: {}", summary.files_matched);
    println!("  Content matches: {}", summary.content_matches);
    println!("  Files skipped: {}", summary.files_skipped);
    println!("  Report: {}", output.display());

    let totals = repository_lines(result);
    if !totals.is_empty() {
        println!("\nFiles by repository:");
        for line in totals {
            println!("  {line}");
        }
    }

    for skipped in result.skipped() {
        println!("  Skipped {}: {}", skipped.repository, skipped.reason);
    }
    for retained in result.retained() {
        println!("  Kept {} at {}", retained.repository, retained.path.display());
    }
}

/// Formats one line per repository with its matched files and records.
fn repository_lines(result: &ScanResult) -> Vec<String> {
    let totals = result.repository_totals();
    let width = totals.iter().map(|t| t.repository.len()).max().unwrap_or(0);
    totals
        .iter()
        .map(|t| {
            format!(
                "{:<width$}  {} files, {} matches",
                t.repository, t.files, t.matches
            )
        })
        .collect()
}
