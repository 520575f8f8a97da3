//! Turning command-line paths into the list of files to check.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tsxcheck_options::{IgnorePatterns, ProjectConfig};
use walkdir::WalkDir;

/// Directory names never descended into.
pub const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "dist", "build"];

/// What to do with a candidate path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Check,
    /// Matched an ignore pattern.
    Ignored,
    /// Named explicitly but without a checked extension.
    NotTsx,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub disposition: Disposition,
}

/// Expand `inputs` in order. Directories are walked recursively, sorted by
/// name, keeping only files with a checked extension. Explicit files keep
/// their position and are classified rather than dropped.
pub fn discover(inputs: &[PathBuf], config: &ProjectConfig, ignore: &IgnorePatterns) -> Vec<Entry> {
    let mut entries = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for path in walk(input, config) {
                let disposition = if ignore.is_ignored(&path) {
                    Disposition::Ignored
                } else {
                    Disposition::Check
                };
                entries.push(Entry { path, disposition });
            }
            continue;
        }

        let disposition = if !config.is_checked_extension(input) {
            Disposition::NotTsx
        } else if ignore.is_ignored(input) {
            Disposition::Ignored
        } else {
            Disposition::Check
        };
        entries.push(Entry {
            path: input.clone(),
            disposition,
        });
    }
    tracing::debug!(inputs = inputs.len(), entries = entries.len(), "discovered files");
    entries
}

fn is_skipped_dir(name: &OsStr) -> bool {
    SKIPPED_DIRS.iter().any(|dir| name == *dir)
}

fn walk(root: &Path, config: &ProjectConfig) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !(e.file_type().is_dir() && is_skipped_dir(e.file_name()))
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && config.is_checked_extension(e.path()))
        .map(|e| e.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "<div></div>").unwrap();
        path
    }

    #[test]
    fn test_walk_skips_vendor_dirs_and_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let app = touch(root, "src/App.tsx");
        let legacy = touch(root, "src/legacy/Old.jsx");
        touch(root, "src/util.ts");
        touch(root, "node_modules/pkg/Index.tsx");
        touch(root, "dist/App.jsx");
        touch(root, "build/App.tsx");
        touch(root, ".git/hooks/x.tsx");

        let entries = discover(
            &[root.to_path_buf()],
            &ProjectConfig::default(),
            &IgnorePatterns::new(),
        );
        let paths: Vec<_> = entries.iter().map(|e| e.path.clone()).collect();
        assert_eq!(paths, [app, legacy]);
        assert!(entries.iter().all(|e| e.disposition == Disposition::Check));
    }

    #[test]
    fn test_explicit_files_are_classified() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let readme = touch(root, "README.md");
        let generated = touch(root, "api.gen.tsx");
        let button = touch(root, "Button.tsx");

        let ignore = IgnorePatterns::parse("*.gen.tsx\n");
        let entries = discover(
            &[readme, generated, button],
            &ProjectConfig::default(),
            &ignore,
        );
        let dispositions: Vec<_> = entries.iter().map(|e| e.disposition).collect();
        assert_eq!(
            dispositions,
            [Disposition::NotTsx, Disposition::Ignored, Disposition::Check]
        );
    }

    #[test]
    fn test_missing_explicit_file_is_still_checked() {
        let entries = discover(
            &[PathBuf::from("does/not/exist.tsx")],
            &ProjectConfig::default(),
            &IgnorePatterns::new(),
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].disposition, Disposition::Check);
    }

    #[test]
    fn test_ignored_inside_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "stories/Button.stories.tsx");
        touch(root, "Button.tsx");

        let ignore = IgnorePatterns::parse("*.stories.tsx");
        let entries = discover(&[root.to_path_buf()], &ProjectConfig::default(), &ignore);
        assert_eq!(entries.len(), 2);
        let ignored: Vec<_> = entries
            .iter()
            .filter(|e| e.disposition == Disposition::Ignored)
            .map(|e| e.path.file_name().unwrap().to_owned())
            .collect();
        assert_eq!(ignored, ["Button.stories.tsx"]);
    }
}
