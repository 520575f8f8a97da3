//! tsxcheck_validator: Validation entry points.
//!
//! Wraps the scanner for buffers, single files and lists of files. File
//! contents come through a [`SourceProvider`]; batches can be validated in
//! parallel with rayon and still reduce to the same result as the
//! sequential fold.

mod provider;

pub use provider::{FsProvider, MemoryProvider, SourceError, SourceProvider};
pub use tsxcheck_core::Position;
pub use tsxcheck_diagnostics::{ErrorKind, ValidationError, ValidationResult};
pub use tsxcheck_scanner::{is_self_closing_tag, OverflowPolicy, ScanOptions, SELF_CLOSING_TAGS};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tsxcheck_scanner::Scanner;

/// Validates buffers and files with fixed scan options.
#[derive(Debug, Clone, Default)]
pub struct Validator<P = FsProvider> {
    provider: P,
    options: ScanOptions,
}

impl Validator<FsProvider> {
    /// A validator reading from disk.
    pub fn with_options(options: ScanOptions) -> Self {
        Self::new(FsProvider, options)
    }
}

impl<P: SourceProvider> Validator<P> {
    pub fn new(provider: P, options: ScanOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Validate an in-memory buffer. `files_checked` stays 0.
    pub fn validate_buffer(&self, content: &[u8]) -> ValidationResult {
        let outcome = Scanner::scan(content, self.options);
        ValidationResult {
            error: outcome.error,
            file: None,
            tags_checked: outcome.tags_checked,
            files_checked: 0,
        }
    }

    /// Read and validate one file. Counts as one checked file even when it
    /// cannot be read.
    pub fn validate_file(&self, path: impl AsRef<Path>) -> ValidationResult {
        let path = path.as_ref();
        let name = path.display().to_string();

        let mut result = match self.provider.read(path) {
            Ok(content) => self.validate_buffer(&content),
            Err(SourceError::OutOfMemory(len)) => {
                tracing::warn!(path = %name, len, "could not allocate file buffer");
                ValidationResult::from_error(ValidationError::OutOfMemory { path: name.clone() })
            }
            Err(err) => {
                tracing::debug!(path = %name, error = %err, "could not read file");
                ValidationResult::from_error(ValidationError::FileUnreadable {
                    path: name.clone(),
                    reason: err.to_string(),
                })
            }
        };
        result.files_checked = 1;

        tracing::debug!(
            path = %name,
            tags = result.tags_checked,
            valid = result.is_valid(),
            "validated file"
        );
        result.with_file(name)
    }

    /// Validate files in order, folding into one result that keeps the first
    /// failure. With `stop_on_first_error`, files after the first invalid
    /// one are not read.
    pub fn validate_files<T: AsRef<Path>>(
        &self,
        paths: &[T],
        stop_on_first_error: bool,
    ) -> ValidationResult {
        let mut combined = ValidationResult::new();
        for path in paths {
            let result = self.validate_file(path);
            let failed = !result.is_valid();
            combined.merge(result);
            if failed && stop_on_first_error {
                tracing::debug!(files = combined.files_checked, "stopping at first error");
                break;
            }
        }
        combined
    }

    /// Validate every file on the rayon pool. Reports keep input order.
    pub fn validate_batch<T>(&self, paths: &[T]) -> BatchReport
    where
        T: AsRef<Path> + Sync,
    {
        let span = tracing::info_span!("validate_batch", files = paths.len());

        // Entered per item: the closure runs on rayon workers.
        let files: Vec<FileReport> = paths
            .par_iter()
            .map(|path| {
                span.in_scope(|| FileReport {
                    path: path.as_ref().to_path_buf(),
                    result: self.validate_file(path),
                })
            })
            .collect();

        let report = BatchReport { files };
        span.in_scope(|| {
            tracing::debug!(
                files = report.files.len(),
                failures = report.failures().count(),
                "batch finished"
            )
        });
        report
    }
}

/// One file's entry in a [`BatchReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: ValidationResult,
}

/// Per-file results of a parallel batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    /// Fold every file into a single result, first failure by index winning.
    /// Equal to what [`Validator::validate_files`] returns without stopping.
    pub fn summary(&self) -> ValidationResult {
        self.files
            .iter()
            .fold(ValidationResult::new(), |mut combined, file| {
                combined.merge(file.result.clone());
                combined
            })
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| !f.result.is_valid())
    }

    pub fn is_valid(&self) -> bool {
        self.files.iter().all(|f| f.result.is_valid())
    }
}

/// Validate a buffer with default options.
pub fn validate_buffer(content: &[u8]) -> ValidationResult {
    Validator::with_options(ScanOptions::default()).validate_buffer(content)
}

/// Validate a file on disk with default options.
pub fn validate_file(path: impl AsRef<Path>) -> ValidationResult {
    Validator::with_options(ScanOptions::default()).validate_file(path)
}

/// Validate files on disk in order with default options.
pub fn validate_files<T: AsRef<Path>>(paths: &[T], stop_on_first_error: bool) -> ValidationResult {
    Validator::with_options(ScanOptions::default()).validate_files(paths, stop_on_first_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory(files: &[(&str, &str)]) -> Validator<MemoryProvider> {
        let mut provider = MemoryProvider::new();
        for (path, content) in files {
            provider.insert(*path, *content);
        }
        Validator::new(provider, ScanOptions::default())
    }

    #[test]
    fn test_buffer_has_no_file() {
        let result = validate_buffer(b"<div></div>");
        assert!(result.is_valid());
        assert_eq!(result.files_checked, 0);
        assert_eq!(result.file, None);
    }

    #[test]
    fn test_missing_file_counts_as_checked() {
        let validator = memory(&[]);
        let result = validator.validate_file("gone.tsx");
        assert_eq!(result.kind(), Some(ErrorKind::FileUnreadable));
        assert_eq!(result.files_checked, 1);
        assert_eq!(
            result.message().unwrap(),
            "gone.tsx: Cannot open file: gone.tsx"
        );
    }

    #[test]
    fn test_stop_on_first_error_skips_rest() {
        let validator = memory(&[("a.tsx", "<b>"), ("b.tsx", "<p></p>")]);
        let result = validator.validate_files(&["a.tsx", "b.tsx"], true);
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.file.as_deref(), Some("a.tsx"));

        let result = validator.validate_files(&["a.tsx", "b.tsx"], false);
        assert_eq!(result.files_checked, 2);
        assert_eq!(result.tags_checked, 1);
    }
}
