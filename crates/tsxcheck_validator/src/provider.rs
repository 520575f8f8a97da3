//! Where file contents come from.

use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a source could not be loaded.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("no such source")]
    NotFound,
    #[error("buffer allocation of {0} bytes failed")]
    OutOfMemory(u64),
}

/// A source of file contents. Shared across rayon workers during batch
/// validation.
pub trait SourceProvider: Send + Sync {
    /// Read the whole of `path` into memory.
    fn read(&self, path: &Path) -> Result<Vec<u8>, SourceError>;
}

/// Reads from the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProvider;

impl SourceProvider for FsProvider {
    fn read(&self, path: &Path) -> Result<Vec<u8>, SourceError> {
        let mut file = File::open(path)?;
        let len = file.metadata()?.len();

        let mut buf = Vec::new();
        let capacity = usize::try_from(len).map_err(|_| SourceError::OutOfMemory(len))?;
        buf.try_reserve_exact(capacity)
            .map_err(|_| SourceError::OutOfMemory(len))?;
        file.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// Serves contents from an in-memory map keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    files: FxHashMap<PathBuf, Vec<u8>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    /// Builder form of [`MemoryProvider::insert`].
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SourceProvider for MemoryProvider {
    fn read(&self, path: &Path) -> Result<Vec<u8>, SourceError> {
        self.files.get(path).cloned().ok_or(SourceError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_fs_provider_reads_whole_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<div></div>").unwrap();
        let content = FsProvider.read(file.path()).unwrap();
        assert_eq!(content, b"<div></div>");
    }

    #[test]
    fn test_fs_provider_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsProvider.read(&dir.path().join("missing.tsx")).unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[test]
    fn test_memory_provider() {
        let provider = MemoryProvider::new().with_file("a.tsx", "<br>");
        assert_eq!(provider.len(), 1);
        assert_eq!(provider.read(Path::new("a.tsx")).unwrap(), b"<br>");
        assert!(matches!(
            provider.read(Path::new("b.tsx")),
            Err(SourceError::NotFound)
        ));
    }
}
