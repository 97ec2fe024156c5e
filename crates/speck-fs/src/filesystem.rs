//! The filesystem collaborator used by the sync engine.
//!
//! All operations are synchronous and take absolute (or caller-rooted)
//! paths. [`LocalFs`] talks to the real disk; tests wrap it to inject
//! per-path failures.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::{Error, NormalizedPath, Result, io};

/// Filesystem operations required to read a release tree and mutate a
/// target tree.
pub trait FileSystem {
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Read the full content of a file.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write a file, creating parent directories as needed.
    fn write(&self, path: &Path, content: &[u8]) -> Result<()>;

    /// Create a directory and all missing ancestors.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Remove a file or a whole directory subtree. Absent paths are a no-op.
    fn remove_all(&self, path: &Path) -> Result<()>;

    /// List the entry names of a directory, sorted.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>>;

    /// Read a file, mapping "not found" to `Ok(None)`.
    fn read_optional(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match self.read(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Recursively collect every file below `root`, as sorted paths
    /// relative to `root`.
    fn walk_files(&self, root: &Path) -> Result<Vec<NormalizedPath>> {
        let mut files = Vec::new();
        let mut pending = vec![NormalizedPath::new("")];

        while let Some(relative) = pending.pop() {
            let dir = root.join(relative.to_native());
            for name in self.list_dir(&dir)? {
                let child = relative.join(&name);
                if self.is_dir(&root.join(child.to_native())) {
                    pending.push(child);
                } else {
                    files.push(child);
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        (**self).is_dir(path)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        (**self).write(path, content)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        (**self).create_dir_all(path)
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        (**self).remove_all(path)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        (**self).list_dir(path)
    }
}

/// The real, disk-backed filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        io::read_bytes(path)
    }

    fn write(&self, path: &Path, content: &[u8]) -> Result<()> {
        debug!(path = %path.display(), bytes = content.len(), "write");
        io::write_atomic(path, content)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| Error::io(path, e))
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        if path.is_dir() {
            debug!(path = %path.display(), "remove subtree");
            fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
        } else if path.exists() {
            fs::remove_file(path).map_err(|e| Error::io(path, e))
        } else {
            Ok(())
        }
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| Error::io(path, e))? {
            let entry = entry.map_err(|e| Error::io(path, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn walk_files_returns_sorted_relative_paths() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFs::new();
        fs.write(&temp.path().join(".speck/templates/story.md"), b"story")
            .unwrap();
        fs.write(&temp.path().join("AGENTS.md"), b"agents").unwrap();
        fs.write(&temp.path().join(".cursor/hooks.json"), b"{}").unwrap();

        let files: Vec<String> = fs
            .walk_files(temp.path())
            .unwrap()
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();

        assert_eq!(
            files,
            vec![".cursor/hooks.json", ".speck/templates/story.md", "AGENTS.md"]
        );
    }

    #[test]
    fn read_optional_maps_missing_to_none() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFs::new();
        assert!(fs.read_optional(&temp.path().join("absent")).unwrap().is_none());
    }

    #[test]
    fn remove_all_handles_files_dirs_and_absent_paths() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFs::new();
        fs.write(&temp.path().join(".speck/a/b.md"), b"x").unwrap();
        fs.write(&temp.path().join("file.txt"), b"x").unwrap();

        fs.remove_all(&temp.path().join(".speck")).unwrap();
        fs.remove_all(&temp.path().join("file.txt")).unwrap();
        fs.remove_all(&temp.path().join("never-existed")).unwrap();

        assert!(!fs.exists(&temp.path().join(".speck")));
        assert!(!fs.exists(&temp.path().join("file.txt")));
    }
}
