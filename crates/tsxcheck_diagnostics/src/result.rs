//! The verdict of one validation call, or of a batch of them.

use crate::{ErrorKind, ValidationError};
use tsxcheck_core::Position;

/// Outcome of validating a buffer, a file, or a batch of files.
///
/// A result is valid exactly when it holds no error. Batch results keep only
/// the first failure (in file order) but count every file and tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    /// The first defect found, if any.
    pub error: Option<ValidationError>,
    /// The file the error came from, set by file and batch validation.
    pub file: Option<String>,
    /// Tags matched: self-closing elements plus successfully closed elements.
    pub tags_checked: u32,
    /// Files processed (0 for a bare buffer).
    pub files_checked: u32,
}

impl ValidationResult {
    /// A fresh, valid result with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_error(error: ValidationError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(ValidationError::kind)
    }

    pub fn position(&self) -> Option<Position> {
        self.error.as_ref().and_then(ValidationError::position)
    }

    /// Human-readable error message, prefixed with the file when known.
    pub fn message(&self) -> Option<String> {
        let error = self.error.as_ref()?;
        Some(match &self.file {
            Some(file) => format!("{}: {}", file, error),
            None => error.to_string(),
        })
    }

    /// Attribute this result to a file.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Fold another file's result into this batch result.
    ///
    /// Counters accumulate; the error already held (the earliest one) is kept.
    pub fn merge(&mut self, other: ValidationResult) {
        self.files_checked += other.files_checked;
        self.tags_checked += other.tags_checked;
        if self.error.is_none() && other.error.is_some() {
            self.error = other.error;
            self.file = other.file;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsxcheck_core::TextSpan;

    fn unclosed_div() -> ValidationError {
        ValidationError::unclosed("div", Position::START, 0)
    }

    #[test]
    fn test_new_result_is_valid() {
        let result = ValidationResult::new();
        assert!(result.is_valid());
        assert_eq!(result.kind(), None);
        assert_eq!(result.message(), None);
        assert_eq!(result.tags_checked, 0);
        assert_eq!(result.files_checked, 0);
    }

    #[test]
    fn test_message_includes_file() {
        let result = ValidationResult::from_error(unclosed_div()).with_file("App.tsx");
        assert_eq!(
            result.message().unwrap(),
            "App.tsx: Unclosed tag <div> at line 1, col 1 (and 0 more unclosed)"
        );
        assert_eq!(result.position(), Some(Position::START));
    }

    #[test]
    fn test_merge_keeps_first_error() {
        let mut combined = ValidationResult::new();

        let mut ok = ValidationResult::new().with_file("a.tsx");
        ok.tags_checked = 3;
        ok.files_checked = 1;
        combined.merge(ok);
        assert!(combined.is_valid());
        assert_eq!(combined.file, None);

        let mut first = ValidationResult::from_error(unclosed_div()).with_file("b.tsx");
        first.files_checked = 1;
        combined.merge(first);

        let mut second = ValidationResult::from_error(ValidationError::unmatched_close(
            "p",
            Position::START,
            TextSpan::new(0, 4),
        ))
        .with_file("c.tsx");
        second.files_checked = 1;
        second.tags_checked = 2;
        combined.merge(second);

        assert_eq!(combined.files_checked, 3);
        assert_eq!(combined.tags_checked, 5);
        assert_eq!(combined.file.as_deref(), Some("b.tsx"));
        assert_eq!(combined.kind(), Some(ErrorKind::UnclosedTag));
    }
}
