//! `.tsxcheckignore` patterns.

use crate::ConfigError;
use globset::{GlobBuilder, GlobMatcher};
use std::path::Path;

/// Name of the ignore file looked up in the working directory.
pub const IGNORE_FILE_NAME: &str = ".tsxcheckignore";

/// Ordered glob patterns. A path is ignored when any pattern matches its
/// full path or its basename. `*` also matches `/`.
#[derive(Debug, Clone, Default)]
pub struct IgnorePatterns {
    patterns: Vec<(String, GlobMatcher)>,
}

impl IgnorePatterns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse ignore-file content: one glob per line, blank lines and lines
    /// starting with `#` skipped.
    pub fn parse(content: &str) -> Self {
        let mut patterns = Self::new();
        for line in content.lines() {
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            patterns.push(line);
        }
        patterns
    }

    /// Load patterns from `path`. A missing file yields no patterns.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let patterns = Self::parse(&content);
                tracing::debug!(
                    path = %path.display(),
                    count = patterns.len(),
                    "loaded ignore patterns"
                );
                Ok(patterns)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Add one pattern. Invalid globs are skipped with a warning; returns
    /// whether the pattern was added.
    pub fn push(&mut self, pattern: &str) -> bool {
        match GlobBuilder::new(pattern).literal_separator(false).build() {
            Ok(glob) => {
                self.patterns
                    .push((pattern.to_string(), glob.compile_matcher()));
                true
            }
            Err(err) => {
                tracing::warn!(pattern, error = %err, "skipping invalid ignore pattern");
                false
            }
        }
    }

    pub fn extend<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.push(pattern.as_ref());
        }
    }

    /// Whether `path` matches any pattern.
    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let basename = path.file_name().map(Path::new);
        self.patterns.iter().any(|(_, matcher)| {
            matcher.is_match(path) || basename.is_some_and(|name| matcher.is_match(name))
        })
    }

    /// The patterns as written, in order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(p, _)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
