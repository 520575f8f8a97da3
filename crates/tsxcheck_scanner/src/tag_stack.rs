//! The stack of open tags and the closing-tag matcher.

use serde::{Deserialize, Serialize};
use tsxcheck_core::{Position, TextSpan};
use tsxcheck_diagnostics::ValidationError;

/// What happens when a push would exceed the depth limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Fail the validation with `StackOverflow`.
    #[default]
    Error,
    /// Drop the push and keep scanning, losing that nesting level.
    Truncate,
}

/// An element or fragment that has been opened but not yet closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag {
    /// Tag name as written; empty for a fragment.
    pub name: String,
    /// Position of the opening `<`.
    pub at: Position,
}

impl OpenTag {
    #[inline]
    pub fn is_fragment(&self) -> bool {
        self.name.is_empty()
    }
}

/// Bounded LIFO stack of open tags.
#[derive(Debug, Clone)]
pub struct TagStack {
    entries: Vec<OpenTag>,
    limit: usize,
    policy: OverflowPolicy,
}

impl TagStack {
    pub const DEFAULT_LIMIT: usize = 256;

    pub fn new() -> Self {
        Self::with_limit(Self::DEFAULT_LIMIT, OverflowPolicy::default())
    }

    pub fn with_limit(limit: usize, policy: OverflowPolicy) -> Self {
        Self {
            entries: Vec::with_capacity(limit.min(32)),
            limit,
            policy,
        }
    }

    /// Open a tag. Fails only under [`OverflowPolicy::Error`] when full.
    pub fn push(&mut self, name: &str, at: Position) -> Result<(), ValidationError> {
        if self.entries.len() >= self.limit {
            return match self.policy {
                OverflowPolicy::Error => Err(ValidationError::stack_overflow(self.limit, at)),
                OverflowPolicy::Truncate => {
                    tracing::trace!(name, line = at.line, "tag stack full, dropping push");
                    Ok(())
                }
            };
        }
        tracing::trace!(name, line = at.line, column = at.column, "push");
        self.entries.push(OpenTag {
            name: name.to_string(),
            at,
        });
        Ok(())
    }

    /// Close the innermost tag, which must be named `name`.
    ///
    /// `at` and `span` locate the closing tag for the error report.
    /// Comparison is exact and case-sensitive; the empty name matches only
    /// a fragment.
    pub fn pop(
        &mut self,
        name: &str,
        at: Position,
        span: TextSpan,
    ) -> Result<OpenTag, ValidationError> {
        let top = self
            .entries
            .pop()
            .ok_or_else(|| ValidationError::unmatched_close(name, at, span))?;
        if top.name != name {
            let err = ValidationError::tag_mismatch(&top.name, top.at, name, at, span);
            self.entries.push(top);
            return Err(err);
        }
        tracing::trace!(name, line = at.line, column = at.column, "pop");
        Ok(top)
    }

    /// End-of-input check: anything still open is an error about the
    /// innermost entry.
    pub fn finish(&self) -> Result<(), ValidationError> {
        match self.entries.last() {
            Some(top) => Err(ValidationError::unclosed(
                &top.name,
                top.at,
                self.entries.len() - 1,
            )),
            None => Ok(()),
        }
    }

    pub fn peek(&self) -> Option<&OpenTag> {
        self.entries.last()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Open tags from outermost to innermost.
    pub fn iter(&self) -> impl Iterator<Item = &OpenTag> {
        self.entries.iter()
    }
}

impl Default for TagStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsxcheck_diagnostics::ErrorKind;

    fn at(column: u32) -> Position {
        Position::new(column as usize - 1, 1, column)
    }

    #[test]
    fn test_push_pop_matching() {
        let mut stack = TagStack::new();
        stack.push("div", at(1)).unwrap();
        stack.push("span", at(6)).unwrap();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.peek().unwrap().name, "span");

        let opened = stack.pop("span", at(12), TextSpan::new(11, 7)).unwrap();
        assert_eq!(opened.at, at(6));
        stack.pop("div", at(19), TextSpan::new(18, 6)).unwrap();
        assert!(stack.is_empty());
        assert!(stack.finish().is_ok());
    }

    #[test]
    fn test_pop_empty_is_unmatched_close() {
        let mut stack = TagStack::new();
        let err = stack.pop("div", at(1), TextSpan::new(0, 6)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnmatchedClose);
        assert_eq!(err.position(), Some(at(1)));
    }

    #[test]
    fn test_pop_mismatch_reports_expected() {
        let mut stack = TagStack::new();
        stack.push("div", at(1)).unwrap();
        stack.push("span", at(6)).unwrap();
        let err = stack.pop("div", at(12), TextSpan::new(11, 6)).unwrap_err();
        match err {
            ValidationError::TagMismatch {
                expected,
                opened_at,
                found,
                at: closed_at,
                ..
            } => {
                assert_eq!(expected, "span");
                assert_eq!(opened_at, at(6));
                assert_eq!(found, "div");
                assert_eq!(closed_at, at(12));
            }
            other => panic!("expected TagMismatch, got {:?}", other),
        }
        // A failed pop leaves the stack untouched.
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut stack = TagStack::new();
        stack.push("Button", at(1)).unwrap();
        let err = stack.pop("button", at(9), TextSpan::new(8, 9)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TagMismatch);
    }

    #[test]
    fn test_fragment_matches_only_fragment() {
        let mut stack = TagStack::new();
        stack.push("", at(1)).unwrap();
        assert!(stack.peek().unwrap().is_fragment());
        assert!(stack.pop("div", at(3), TextSpan::new(2, 6)).is_err());
        assert!(stack.pop("", at(3), TextSpan::new(2, 3)).is_ok());
    }

    #[test]
    fn test_finish_reports_innermost_and_count() {
        let mut stack = TagStack::new();
        stack.push("main", at(1)).unwrap();
        stack.push("section", at(7)).unwrap();
        stack.push("p", at(16)).unwrap();
        let err = stack.finish().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unclosed tag <p> at line 1, col 16 (and 2 more unclosed)"
        );
    }

    #[test]
    fn test_overflow_error_policy() {
        let mut stack = TagStack::with_limit(2, OverflowPolicy::Error);
        stack.push("a", at(1)).unwrap();
        stack.push("b", at(4)).unwrap();
        let err = stack.push("c", at(7)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StackOverflow);
        assert_eq!(err.to_string(), "Tag nesting exceeds maximum depth of 2");
    }

    #[test]
    fn test_overflow_truncate_policy() {
        let mut stack = TagStack::with_limit(2, OverflowPolicy::Truncate);
        stack.push("a", at(1)).unwrap();
        stack.push("b", at(4)).unwrap();
        stack.push("c", at(7)).unwrap();
        assert_eq!(stack.depth(), 2);
        let names: Vec<_> = stack.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
