//! The persisted template version of a project.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use speck_fs::{FileSystem, LocalFs, SpeckPath};
use tracing::debug;

use crate::Result;

/// `**Speck Version**: 1.4` in older `AGENTS.md` files.
static LEGACY_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*Speck Version\*\*:\s*(\d+\.\d+)").expect("valid legacy version regex")
});

/// An opaque release tag such as `v1.4.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionMarker(String);

impl VersionMarker {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionMarker {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for VersionMarker {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for VersionMarker {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Reads and writes `.speck/VERSION` in a project.
pub struct VersionStore<F: FileSystem = LocalFs> {
    fs: F,
    root: PathBuf,
}

impl VersionStore<LocalFs> {
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::new(LocalFs::new(), root)
    }
}

impl<F: FileSystem> VersionStore<F> {
    pub fn new(fs: F, root: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The version the project was last synced to.
    ///
    /// `.speck/VERSION` wins; an `AGENTS.md` annotation is consulted only
    /// when that file is absent or empty.
    pub fn read_version(&self) -> Result<Option<VersionMarker>> {
        let version_file = self.root.join(SpeckPath::VersionFile.as_str());
        if let Some(bytes) = self.fs.read_optional(&version_file)? {
            let token = String::from_utf8_lossy(&bytes).trim().to_string();
            if !token.is_empty() {
                return Ok(Some(VersionMarker(token)));
            }
        }

        let agents = self.root.join(SpeckPath::AgentsFile.as_str());
        let Some(bytes) = self.fs.read_optional(&agents)? else {
            return Ok(None);
        };
        let legacy = parse_legacy_annotation(&String::from_utf8_lossy(&bytes));
        if let Some(version) = &legacy {
            debug!(%version, "version taken from AGENTS.md annotation");
        }
        Ok(legacy)
    }

    /// Persist `token` to `.speck/VERSION`, without a trailing newline.
    pub fn write_version(&self, token: &VersionMarker) -> Result<()> {
        let path = self.root.join(SpeckPath::VersionFile.as_str());
        self.fs.write(&path, token.as_str().as_bytes())?;
        debug!(version = %token, "version saved");
        Ok(())
    }
}

/// `v<major>.<minor>.0` from a `**Speck Version**: <major>.<minor>` line.
pub fn parse_legacy_annotation(agents: &str) -> Option<VersionMarker> {
    LEGACY_ANNOTATION
        .captures(agents)
        .map(|caps| VersionMarker(format!("v{}.0", &caps[1])))
}
