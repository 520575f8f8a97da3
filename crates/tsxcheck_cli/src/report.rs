//! Printing per-file results and the final summary.

use clap::ValueEnum;
use miette::{IntoDiagnostic, NamedSource};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tsxcheck_validator::{ErrorKind, ValidationError, ValidationResult};

// ANSI color codes
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per file plus a summary.
    Text,
    /// A single JSON report on stdout.
    Json,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileRecord {
    path: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorRecord>,
}

#[derive(Debug, Serialize)]
struct ErrorRecord {
    kind: ErrorKind,
    message: String,
    line: Option<u32>,
    column: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    files: &'a [FileRecord],
    files_checked: u32,
    tags_checked: u32,
    errors: usize,
    elapsed_secs: f64,
}

pub struct Reporter {
    format: OutputFormat,
    quiet: bool,
    color: bool,
    snippets: bool,
    records: Vec<FileRecord>,
}

impl Reporter {
    pub fn new(format: OutputFormat, quiet: bool, color: bool, snippets: bool) -> Self {
        Self {
            format,
            quiet,
            color,
            snippets,
            records: Vec::new(),
        }
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn record(&mut self, path: &Path, status: &'static str) {
        self.records.push(FileRecord {
            path: path.display().to_string(),
            status,
            tags: None,
            error: None,
        });
    }

    /// An explicitly named file without a checked extension.
    pub fn not_tsx(&mut self, path: &Path) {
        match self.format {
            OutputFormat::Json => self.record(path, "skipped"),
            OutputFormat::Text if !self.quiet => {
                eprintln!("Skipping non-TSX file: {}", path.display());
            }
            OutputFormat::Text => {}
        }
    }

    pub fn ignored(&mut self, path: &Path) {
        match self.format {
            OutputFormat::Json => self.record(path, "ignored"),
            OutputFormat::Text if !self.quiet => {
                println!("{} {} (ignored)", self.paint(YELLOW, "⊘"), path.display());
            }
            OutputFormat::Text => {}
        }
    }

    pub fn checked(&mut self, path: &Path, result: &ValidationResult) {
        if self.format == OutputFormat::Json {
            let error = result.error.as_ref().map(|err| ErrorRecord {
                kind: err.kind(),
                message: err.to_string(),
                line: err.position().map(|p| p.line),
                column: err.position().map(|p| p.column),
            });
            self.records.push(FileRecord {
                path: path.display().to_string(),
                status: if error.is_some() { "error" } else { "ok" },
                tags: Some(result.tags_checked),
                error,
            });
            return;
        }

        match &result.error {
            None if !self.quiet => {
                println!(
                    "{} {} ({} tags)",
                    self.paint(GREEN, "✓"),
                    path.display(),
                    result.tags_checked
                );
            }
            None => {}
            Some(err) => {
                let mark = self.paint(RED, "✗");
                match err.position() {
                    Some(at) => eprintln!(
                        "{} {}:{}:{}: {}",
                        mark,
                        path.display(),
                        at.line,
                        at.column,
                        err
                    ),
                    None => eprintln!("{} {}: {}", mark, path.display(), err),
                }
                if self.snippets {
                    render_snippet(path, err);
                }
            }
        }
    }

    #[cfg(test)]
    pub fn records_json(&self) -> Vec<serde_json::Value> {
        self.records
            .iter()
            .map(|record| serde_json::to_value(record).unwrap())
            .collect()
    }

    /// Print the summary line, or the whole JSON report.
    pub fn finish(
        &self,
        summary: &ValidationResult,
        errors: usize,
        elapsed: Duration,
    ) -> miette::Result<()> {
        if self.format == OutputFormat::Json {
            let report = JsonReport {
                files: &self.records,
                files_checked: summary.files_checked,
                tags_checked: summary.tags_checked,
                errors,
                elapsed_secs: elapsed.as_secs_f64(),
            };
            let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
            println!("{}", json);
            return Ok(());
        }

        if self.quiet && errors == 0 {
            return Ok(());
        }
        let line = summary_line(summary, errors, elapsed);
        println!();
        println!("{}", self.paint(if errors > 0 { RED } else { GREEN }, &line));
        Ok(())
    }
}

fn summary_line(summary: &ValidationResult, errors: usize, elapsed: Duration) -> String {
    let mut line = format!(
        "Checked {} files, {} tags in {:.3}s",
        summary.files_checked,
        summary.tags_checked,
        elapsed.as_secs_f64()
    );
    if errors > 0 {
        line.push_str(&format!(" - {} error(s) found", errors));
    }
    line
}

/// Render `err` as a labelled source excerpt. Errors without a position, or
/// files that can no longer be read, print nothing extra.
fn render_snippet(path: &Path, err: &ValidationError) {
    if err.position().is_none() {
        return;
    }
    match std::fs::read(path) {
        Ok(bytes) => eprintln!("{:?}", snippet_report(path, err, bytes)),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cannot reread for snippet");
        }
    }
}

/// Labels are byte offsets, so the source stays raw bytes even when it is
/// not valid UTF-8.
fn snippet_report(path: &Path, err: &ValidationError, source: Vec<u8>) -> miette::Report {
    miette::Report::new(err.clone())
        .with_source_code(NamedSource::new(path.display().to_string(), source))
}
