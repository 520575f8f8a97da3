//! Source positions and spans.
//!
//! A [`Position`] is what diagnostics show to a user (1-based line and
//! column); a [`TextSpan`] is what renderers need to underline source text.

use serde::Serialize;
use std::fmt;

/// A location in source text.
///
/// `line` and `column` are 1-based. The column counts Unicode scalar values
/// on the current line, so a multibyte character advances it by one.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct Position {
    /// Byte offset from the start of the text.
    pub offset: usize,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl Position {
    /// The position of the first byte of a text.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };

    #[inline]
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The span from this position up to (excluding) byte offset `end`.
    #[inline]
    pub fn span_to(&self, end: usize) -> TextSpan {
        TextSpan::from_bounds(self.offset, end.max(self.offset))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.line, self.column, self.offset)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A span in source text, defined by a start byte offset and a length.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct TextSpan {
    /// The byte offset where this span starts.
    pub start: usize,
    /// The length of this span in bytes.
    pub length: usize,
}

impl TextSpan {
    #[inline]
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end offsets.
    #[inline]
    pub fn from_bounds(start: usize, end: usize) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    /// The end offset of this span (exclusive).
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}
