use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glob::glob;
use log::{LevelFilter, debug};
use pgsread_core::InspectError;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("PGSREAD_BUILD_COMMIT"),
    ", ",
    env!("PGSREAD_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "pgsread")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder and validator for PGS subtitle segment streams (.sup).",
    long_about = None,
    after_help = "Examples:\n  pgsread sup dump subtitles.sup -o report.json\n  pgsread sup dump subtitles.sup --stdout --pretty\n  pgsread sup check subtitles.sup"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on .sup segment streams.
    Sup {
        #[command(subcommand)]
        command: SupCommands,
    },
}

#[derive(Subcommand, Debug)]
enum SupCommands {
    /// Decode every segment and write a versioned JSON report.
    #[command(alias = "inspect")]
    #[command(
        after_help = "Examples:\n  pgsread sup dump subtitles.sup -o report.json\n  pgsread sup inspect subtitles.sup --stdout"
    )]
    Dump {
        /// Path to a .sup file
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Decode every segment and report the first structural error, if any.
    Check {
        /// Path to a .sup file
        input: PathBuf,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Commands::Sup { command } = cli.command;
    let result = match command {
        SupCommands::Dump {
            input,
            report,
            stdout,
            pretty,
            compact,
            quiet,
        } => {
            let report = report.filter(|_| !stdout);
            cmd_sup_dump(&input, report.as_deref(), pretty && !compact, quiet)
        }
        SupCommands::Check { input, quiet } => cmd_sup_check(&input, quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// User-facing failure: one message line, optionally followed by a hint.
#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
        }
    }

    fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err))
    }
}

impl From<InspectError> for CliError {
    fn from(err: InspectError) -> Self {
        let hint = match &err {
            InspectError::Source(_) => "check that the input is readable".to_string(),
            InspectError::Decode { index, .. } => format!(
                "{} segment(s) decoded before the failure; the stream cannot be resumed",
                index
            ),
        };
        CliError::new(format!("decode failed: {}", err)).hint(hint)
    }
}

/// `report` is `None` when the report goes to stdout.
fn cmd_sup_dump(
    input: &Path,
    report: Option<&Path>,
    pretty: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let input = resolve_input(input)?;
    if let Some(report) = report {
        ensure_distinct_output(report, &input)?;
    }

    let rep = pgsread_core::inspect_sup_file(&input)?;
    debug!(
        "{} segments from {}",
        rep.summary.segments_total,
        input.display()
    );
    let json = if pretty {
        serde_json::to_string_pretty(&rep)
    } else {
        serde_json::to_string(&rep)
    }
    .context("JSON serialization failed")?;

    match report {
        None => print!("{}", json),
        Some(report) => {
            write_report(report, &json)?;
            if !quiet {
                eprintln!("OK: report written -> {}", report.display());
            }
        }
    }
    Ok(())
}

fn cmd_sup_check(input: &Path, quiet: bool) -> Result<(), CliError> {
    let input = resolve_input(input)?;
    let summary = pgsread_core::summarize_sup_file(&input)?;
    if !quiet {
        eprintln!(
            "OK: {} segments, {} display sets -> {}",
            summary.segments_total,
            summary.display_sets,
            input.display()
        );
    }
    Ok(())
}

fn write_report(path: &Path, json: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory: {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("failed to write report: {}", path.display()))
}

/// Refuse to overwrite the input stream with its own report.
///
/// A report path that does not exist yet cannot name the input.
fn ensure_distinct_output(report: &Path, input: &Path) -> Result<(), CliError> {
    let (Ok(report_abs), Ok(input_abs)) = (fs::canonicalize(report), fs::canonicalize(input))
    else {
        return Ok(());
    };
    if report_abs == input_abs {
        return Err(
            CliError::new(format!(
                "report path must differ from input: {}",
                report.display()
            ))
            .hint("choose a different output path"),
        );
    }
    Ok(())
}

/// Expand a glob to its single match, then check for an existing `.sup` file.
fn resolve_input(input: &Path) -> Result<PathBuf, CliError> {
    let path = if is_glob_pattern(input) {
        expand_single(input)?
    } else {
        input.to_path_buf()
    };

    match fs::metadata(&path) {
        Err(_) => {
            return Err(
                CliError::new(format!("input file not found: {}", path.display()))
                    .hint("use a .sup file"),
            );
        }
        Ok(meta) if !meta.is_file() => {
            return Err(
                CliError::new(format!("input is not a file: {}", path.display()))
                    .hint("use a .sup file"),
            );
        }
        Ok(_) => {}
    }

    let is_sup = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sup"));
    if !is_sup {
        return Err(
            CliError::new(format!("unsupported input format '{}'", path.display()))
                .hint("expected a .sup file"),
        );
    }
    Ok(path)
}

fn expand_single(pattern: &Path) -> Result<PathBuf, CliError> {
    let pattern = pattern.to_string_lossy();
    let entries = glob(&pattern).map_err(|err| {
        CliError::new(format!("invalid input pattern '{}'", pattern)).hint(err.msg)
    })?;
    let mut matches: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();

    match matches.len() {
        0 => Err(CliError::new(format!("no files match pattern '{}'", pattern))
            .hint("check the path or quote the pattern")),
        1 => Ok(matches.remove(0)),
        n => Err(CliError::new(format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern, n
        ))
        .hint("pass a single .sup file, or run once per file")),
    }
}

fn is_glob_pattern(input: &Path) -> bool {
    input
        .to_str()
        .is_some_and(|s| s.contains(['*', '?', '[']))
}
