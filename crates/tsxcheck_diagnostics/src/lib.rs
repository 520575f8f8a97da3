//! tsxcheck_diagnostics: Structural errors and validation results.
//!
//! Every defect the engine can find is a [`ValidationError`] variant carrying
//! its own message and, where it points into source text, a [`Position`] and
//! a labelled span for rendering. Errors are always returned as data inside a
//! [`ValidationResult`]; nothing in the engine panics or propagates them as
//! control flow.

pub mod result;

pub use result::ValidationResult;

use miette::{Diagnostic, SourceSpan};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tsxcheck_core::{Position, TextSpan};

/// The fieldless category of a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnmatchedClose,
    TagMismatch,
    /// Covers both unclosed elements and unclosed fragments.
    UnclosedTag,
    StackOverflow,
    FileUnreadable,
    OutOfMemory,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnmatchedClose => "unmatched_close",
            ErrorKind::TagMismatch => "tag_mismatch",
            ErrorKind::UnclosedTag => "unclosed_tag",
            ErrorKind::StackOverflow => "stack_overflow",
            ErrorKind::FileUnreadable => "file_unreadable",
            ErrorKind::OutOfMemory => "out_of_memory",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structural defect or an input failure.
///
/// Tag names are stored as written; the empty name denotes a fragment, so
/// `</{name}>` renders a closing fragment as `</>`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum ValidationError {
    #[error("Closing tag </{name}> has no matching opening tag")]
    #[diagnostic(
        code(tsx::unmatched_close),
        help("remove the closing tag or add the opening tag it belongs to")
    )]
    UnmatchedClose {
        name: String,
        at: Position,
        #[label("nothing is open here")]
        span: SourceSpan,
    },

    #[error(
        "Mismatched tags: expected </{expected}> (opened at line {}) but found </{found}>",
        .opened_at.line
    )]
    #[diagnostic(code(tsx::tag_mismatch))]
    TagMismatch {
        expected: String,
        opened_at: Position,
        found: String,
        at: Position,
        #[label("this closing tag does not match")]
        span: SourceSpan,
        #[label("innermost open tag")]
        opened_span: SourceSpan,
    },

    #[error(
        "Unclosed tag <{name}> at line {}, col {} (and {others} more unclosed)",
        .at.line,
        .at.column
    )]
    #[diagnostic(code(tsx::unclosed_tag))]
    UnclosedTag {
        name: String,
        at: Position,
        /// Open entries still on the stack beneath this one.
        others: usize,
        #[label("never closed")]
        span: SourceSpan,
    },

    #[error("Unclosed fragment <> at line {}, col {}", .at.line, .at.column)]
    #[diagnostic(code(tsx::unclosed_tag))]
    UnclosedFragment {
        at: Position,
        others: usize,
        #[label("never closed")]
        span: SourceSpan,
    },

    #[error("Tag nesting exceeds maximum depth of {limit}")]
    #[diagnostic(
        code(tsx::stack_overflow),
        help("raise `maxDepth` or use the `truncate` overflow policy")
    )]
    StackOverflow {
        limit: usize,
        at: Position,
        #[label("one level too deep")]
        span: SourceSpan,
    },

    #[error("Cannot open file: {path}")]
    #[diagnostic(code(tsx::file_unreadable))]
    FileUnreadable { path: String, reason: String },

    #[error("Out of memory reading: {path}")]
    #[diagnostic(code(tsx::out_of_memory))]
    OutOfMemory { path: String },
}

impl ValidationError {
    pub fn unmatched_close(name: &str, at: Position, span: TextSpan) -> Self {
        ValidationError::UnmatchedClose {
            name: name.to_string(),
            at,
            span: source_span(span),
        }
    }

    pub fn tag_mismatch(
        expected: &str,
        opened_at: Position,
        found: &str,
        at: Position,
        span: TextSpan,
    ) -> Self {
        // `<` plus the name, or `<>` for a fragment.
        let opened_end = opened_at.offset + expected.len().max(1) + 1;
        ValidationError::TagMismatch {
            expected: expected.to_string(),
            opened_at,
            found: found.to_string(),
            at,
            span: source_span(span),
            opened_span: source_span(opened_at.span_to(opened_end)),
        }
    }

    /// An element or fragment left open at end of input.
    pub fn unclosed(name: &str, at: Position, others: usize) -> Self {
        let span = source_span(at.span_to(at.offset + name.len().max(1) + 1));
        if name.is_empty() {
            ValidationError::UnclosedFragment { at, others, span }
        } else {
            ValidationError::UnclosedTag {
                name: name.to_string(),
                at,
                others,
                span,
            }
        }
    }

    pub fn stack_overflow(limit: usize, at: Position) -> Self {
        ValidationError::StackOverflow {
            limit,
            at,
            span: source_span(at.span_to(at.offset + 1)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::UnmatchedClose { .. } => ErrorKind::UnmatchedClose,
            ValidationError::TagMismatch { .. } => ErrorKind::TagMismatch,
            ValidationError::UnclosedTag { .. } | ValidationError::UnclosedFragment { .. } => {
                ErrorKind::UnclosedTag
            }
            ValidationError::StackOverflow { .. } => ErrorKind::StackOverflow,
            ValidationError::FileUnreadable { .. } => ErrorKind::FileUnreadable,
            ValidationError::OutOfMemory { .. } => ErrorKind::OutOfMemory,
        }
    }

    /// Where in the source the defect was detected, if it is structural.
    pub fn position(&self) -> Option<Position> {
        match self {
            ValidationError::UnmatchedClose { at, .. }
            | ValidationError::TagMismatch { at, .. }
            | ValidationError::UnclosedTag { at, .. }
            | ValidationError::UnclosedFragment { at, .. }
            | ValidationError::StackOverflow { at, .. } => Some(*at),
            ValidationError::FileUnreadable { .. } | ValidationError::OutOfMemory { .. } => None,
        }
    }
}

fn source_span(span: TextSpan) -> SourceSpan {
    (span.start, span.length).into()
}
