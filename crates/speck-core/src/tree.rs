//! In-memory model of an extracted release.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use speck_fs::{FileSystem, NormalizedPath};
use tracing::debug;

use crate::{Error, Result};

/// One file of a release tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: NormalizedPath,
    pub content: Vec<u8>,
}

impl FileEntry {
    pub fn new(path: impl Into<NormalizedPath>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Content as UTF-8, for strategies that need text.
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.content).map_err(|_| {
            speck_fs::Error::InvalidUtf8 {
                path: self.path.to_native(),
            }
            .into()
        })
    }
}

/// The immutable file hierarchy of one release, keyed by relative path.
///
/// Directories are implicit: a path is a directory when some entry lies
/// below it.
#[derive(Debug, Clone, Default)]
pub struct ReleaseTree {
    root: Option<PathBuf>,
    entries: BTreeMap<NormalizedPath, FileEntry>,
}

impl ReleaseTree {
    /// Read every file below `root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceMissing`] if `root` is not a directory, or a
    /// filesystem error if a release file cannot be read.
    pub fn load(fs: &impl FileSystem, root: &Path) -> Result<Self> {
        if !fs.is_dir(root) {
            return Err(Error::SourceMissing {
                path: root.to_path_buf(),
            });
        }

        let mut entries = BTreeMap::new();
        for path in fs.walk_files(root)? {
            let content = fs.read(&root.join(path.to_native()))?;
            entries.insert(path.clone(), FileEntry { path, content });
        }
        debug!(root = %root.display(), files = entries.len(), "loaded release tree");

        Ok(Self {
            root: Some(root.to_path_buf()),
            entries,
        })
    }

    pub fn from_entries(entries: impl IntoIterator<Item = FileEntry>) -> Self {
        Self {
            root: None,
            entries: entries
                .into_iter()
                .map(|entry| (entry.path.clone(), entry))
                .collect(),
        }
    }

    /// Where the tree was loaded from, if it came from disk.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.entries.get(&NormalizedPath::new(path))
    }

    /// All files at or below `prefix`, sorted.
    pub fn within<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a FileEntry> + 'a {
        self.entries
            .values()
            .filter(move |entry| entry.path.is_within(prefix) && entry.path.as_str() != prefix)
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.within(path).next().is_some()
    }

    /// Every file, in sorted path order.
    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use speck_fs::LocalFs;
    use tempfile::TempDir;

    #[test]
    fn load_reads_all_files() {
        let temp = TempDir::new().unwrap();
        let fs = LocalFs::new();
        fs.write(&temp.path().join(".speck/templates/story.md"), b"story")
            .unwrap();
        fs.write(&temp.path().join("AGENTS.md"), b"agents").unwrap();

        let tree = ReleaseTree::load(&fs, temp.path()).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get("AGENTS.md").unwrap().content, b"agents");
        assert!(tree.is_dir(".speck"));
        assert!(!tree.is_dir("AGENTS.md"));
        assert_eq!(tree.root(), Some(temp.path()));
    }

    #[test]
    fn missing_root_is_source_missing() {
        let temp = TempDir::new().unwrap();
        let result = ReleaseTree::load(&LocalFs::new(), &temp.path().join("absent"));
        assert!(matches!(result, Err(Error::SourceMissing { .. })));
    }

    #[test]
    fn within_respects_segment_boundaries() {
        let tree = ReleaseTree::from_entries([
            FileEntry::new(".cursor/hooks/a.sh", "a"),
            FileEntry::new(".cursor/hooks.json", "{}"),
        ]);
        let paths: Vec<&str> = tree.within(".cursor/hooks").map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec![".cursor/hooks/a.sh"]);
    }

    #[test]
    fn invalid_utf8_text_is_an_error() {
        let entry = FileEntry::new("AGENTS.md", vec![0xff, 0xfe]);
        assert!(entry.text().is_err());
    }
}
