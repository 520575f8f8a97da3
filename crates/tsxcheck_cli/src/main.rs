//! tsxcheck: Structural validation of TSX/JSX markup.
//!
//! Usage:
//!   tsxcheck [options] <path>...
//!
//! Directories are searched recursively for `.tsx` and `.jsx` files.

mod discover;
mod report;
mod tracing_config;

use clap::{Parser as ClapParser, ValueEnum};
use discover::Disposition;
use miette::MietteHandlerOpts;
use report::{OutputFormat, Reporter};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tsxcheck_options::{
    load_config, ConfigError, IgnorePatterns, ProjectConfig, IGNORE_FILE_NAME,
};
use tsxcheck_validator::{ValidationResult, Validator};

#[derive(ClapParser, Debug)]
#[command(
    name = "tsxcheck",
    version,
    about = "TSX/JSX tag validator - fast markup validation",
    after_help = "Examples:\n  tsxcheck src\n  find src -name '*.tsx' | xargs tsxcheck\n  tsxcheck -s src/components/Button.tsx"
)]
struct Cli {
    /// Files or directories to check.
    #[arg(value_name = "PATH", required = true)]
    paths: Vec<PathBuf>,

    /// Only output errors.
    #[arg(short, long)]
    quiet: bool,

    /// Stop on first error.
    #[arg(short = 's', long = "stop")]
    stop: bool,

    /// When to use ANSI colors.
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Show the offending source for each error.
    #[arg(long)]
    snippets: bool,

    /// Path to tsxcheck.json (default: ./tsxcheck.json if present).
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => std::io::stdout().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Exit status when the configuration cannot be used.
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_config::init_tracing();

    let color = cli.color.enabled();
    let hook = miette::set_hook(Box::new(move |_| {
        Box::new(MietteHandlerOpts::new().color(color).build())
    }));
    if hook.is_err() {
        tracing::debug!("miette hook already installed");
    }

    ExitCode::from(exit_status(run(&cli, color, Path::new("."))))
}

/// Map a run to its exit status, printing a fatal report.
fn exit_status(result: miette::Result<u8>) -> u8 {
    match result {
        Ok(status) => status,
        Err(report) => {
            eprintln!("{:?}", report);
            EXIT_FATAL
        }
    }
}

fn load_project_config(
    explicit: Option<&Path>,
    base: &Path,
) -> Result<ProjectConfig, ConfigError> {
    match explicit {
        Some(path) => load_config(path),
        None => Ok(ProjectConfig::find(base)?
            .map(|(_, config)| config)
            .unwrap_or_default()),
    }
}

/// Totals of a run, before the summary is printed.
#[derive(Debug)]
struct Outcome {
    summary: ValidationResult,
    /// Files that failed.
    errors: usize,
}

impl Outcome {
    fn exit_status(&self) -> u8 {
        if self.errors > 0 {
            1
        } else {
            0
        }
    }
}

fn run(cli: &Cli, color: bool, base: &Path) -> miette::Result<u8> {
    let start = Instant::now();
    let mut reporter = Reporter::new(cli.format, cli.quiet, color, cli.snippets);
    let outcome = check(cli, base, &mut reporter)?;
    reporter.finish(&outcome.summary, outcome.errors, start.elapsed())?;
    Ok(outcome.exit_status())
}

/// Load configuration and ignore files from `base`, then check every
/// discovered file. Per-file lines go to `reporter`.
fn check(cli: &Cli, base: &Path, reporter: &mut Reporter) -> Result<Outcome, ConfigError> {
    let config = load_project_config(cli.config.as_deref(), base)?;
    let mut ignore = IgnorePatterns::load(&base.join(IGNORE_FILE_NAME))?;
    if let Some(extra) = &config.ignore {
        ignore.extend(extra);
    }

    let entries = discover::discover(&cli.paths, &config, &ignore);
    let validator = Validator::with_options(config.scan_options());
    let stop = cli.stop || config.stop_on_first_error();

    // Stopping early needs files checked one at a time.
    let mut batch = if stop || !config.parallel() {
        None
    } else {
        let paths: Vec<&Path> = entries
            .iter()
            .filter(|e| e.disposition == Disposition::Check)
            .map(|e| e.path.as_path())
            .collect();
        Some(validator.validate_batch(&paths).files.into_iter())
    };

    let mut summary = ValidationResult::new();
    let mut errors = 0usize;
    for entry in &entries {
        match entry.disposition {
            Disposition::NotTsx => reporter.not_tsx(&entry.path),
            Disposition::Ignored => reporter.ignored(&entry.path),
            Disposition::Check => {
                let result = match batch.as_mut() {
                    Some(files) => match files.next() {
                        Some(file) => file.result,
                        None => break,
                    },
                    None => validator.validate_file(&entry.path),
                };
                let failed = !result.is_valid();
                reporter.checked(&entry.path, &result);
                summary.merge(result);
                if failed {
                    errors += 1;
                    if stop {
                        break;
                    }
                }
            }
        }
    }

    Ok(Outcome { summary, errors })
}
