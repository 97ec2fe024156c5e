//! ReleaseProvider trait and the extracted release handle

use std::path::Path;

use async_trait::async_trait;
use tempfile::TempDir;

use crate::{ChangelogEntry, Release, Result};

/// A release archive unpacked into a temporary directory.
///
/// The directory is removed when the handle is dropped.
#[derive(Debug)]
pub struct ExtractedRelease {
    tag: String,
    dir: TempDir,
}

impl ExtractedRelease {
    pub fn new(tag: impl Into<String>, dir: TempDir) -> Self {
        Self {
            tag: tag.into(),
            dir,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Root of the release tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Source of release metadata and archives.
#[async_trait]
pub trait ReleaseProvider: Send + Sync {
    /// The newest published release.
    async fn latest_release(&self) -> Result<Release>;

    /// A release by tag; [`Error::NotFound`](crate::Error::NotFound) when
    /// it does not exist.
    async fn release_by_tag(&self, tag: &str) -> Result<Release>;

    /// Every published release, newest first.
    async fn releases(&self) -> Result<Vec<Release>>;

    /// Releases newer than `from` up to and including `to`, or `None` if
    /// either tag is unknown.
    async fn changelog(&self, from: &str, to: &str) -> Result<Option<Vec<ChangelogEntry>>> {
        let releases = self.releases().await?;
        Ok(crate::changelog_between(&releases, from, to))
    }

    /// Download and unpack the archive for `tag`.
    async fn extract_release(&self, tag: &str) -> Result<ExtractedRelease>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracted_release_is_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();
        let release = ExtractedRelease::new("v1.0.0", dir);
        assert_eq!(release.tag(), "v1.0.0");
        assert!(release.path().is_dir());

        drop(release);
        assert!(!path.exists());
    }
}
