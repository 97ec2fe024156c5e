//! [`FaultyFs`]: inject per-path I/O failures.
//!
//! Permission bits are ignored when tests run as root, so failures are
//! simulated at the [`FileSystem`] seam instead.

use std::collections::HashSet;
use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};

use speck_fs::{Error, FileSystem, LocalFs, Result};

/// Wraps [`LocalFs`] and fails reads or writes for selected paths.
#[derive(Debug, Default)]
pub struct FaultyFs {
    inner: LocalFs,
    failing_writes: HashSet<PathBuf>,
    failing_reads: HashSet<PathBuf>,
}

impl FaultyFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write to `path` fail with "permission denied".
    pub fn fail_write(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing_writes.insert(path.into());
        self
    }

    /// Make every read of `path` fail with "permission denied".
    pub fn fail_read(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing_reads.insert(path.into());
        self
    }

    fn denied(path: &Path) -> Error {
        Error::io(path, IoError::new(ErrorKind::PermissionDenied, "permission denied"))
    }
}

impl FileSystem for FaultyFs {
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        if self.failing_reads.contains(path) {
            return Err(Self::denied(path));
        }
        self.inner.read(path)
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        if self.failing_writes.contains(path) {
            return Err(Self::denied(path));
        }
        self.inner.write(path, content)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.inner.create_dir_all(path)
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        self.inner.remove_all(path)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        self.inner.list_dir(path)
    }
}
