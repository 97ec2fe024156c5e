//! Reserved locations inside a Speck-managed project.

use std::path::Path;

/// Well-known paths relative to the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeckPath {
    /// The `.speck` directory (tool-owned methodology subtree)
    SpeckDir,
    /// The `.speck/VERSION` marker
    VersionFile,
    /// The `AGENTS.md` instructions document
    AgentsFile,
    /// The `.speckignore` file (legacy ignore-list mode)
    IgnoreFile,
}

impl SpeckPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpeckDir => ".speck",
            Self::VersionFile => ".speck/VERSION",
            Self::AgentsFile => "AGENTS.md",
            Self::IgnoreFile => ".speckignore",
        }
    }
}

impl AsRef<Path> for SpeckPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for SpeckPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for SpeckPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
