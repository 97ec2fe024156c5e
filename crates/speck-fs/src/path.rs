//! Relative, slash-separated paths inside a release or project tree

use std::fmt;
use std::path::{Path, PathBuf};

/// A path relative to a tree root, always written with `/`.
///
/// Release trees and project trees are compared by these paths, so every
/// path the sync engine sees goes through this type. Backslashes become
/// slashes, `.` segments and empty segments are dropped, and a trailing
/// slash is removed. Comparison is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        let segments: Vec<&str> = raw
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect();
        Self(segments.join("/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Platform path for joining onto a tree root.
    pub fn to_native(&self) -> PathBuf {
        self.segments().collect()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|segment| !segment.is_empty())
    }

    pub fn join(&self, rest: &str) -> Self {
        if self.is_root() {
            return Self::new(rest);
        }
        Self::new(format!("{}/{}", self.0, rest))
    }

    /// The last segment's extension; dotfiles such as `.gitignore` have none.
    pub fn extension(&self) -> Option<&str> {
        let name = self.segments().last()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    /// Whether this path equals `prefix` or lies in the subtree below it.
    ///
    /// `.cursor/hooks` contains `.cursor/hooks/run.sh` but not
    /// `.cursor/hooks.json`.
    pub fn is_within(&self, prefix: &str) -> bool {
        let prefix = prefix.trim_end_matches('/');
        match self.0.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r".cursor\commands\speck.md", ".cursor/commands/speck.md")]
    #[case("./.speck/", ".speck")]
    #[case(".speck//templates/./story.md", ".speck/templates/story.md")]
    #[case("", "")]
    fn normalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(NormalizedPath::new(input).as_str(), expected);
    }

    #[test]
    fn join_on_root() {
        assert_eq!(NormalizedPath::new("").join("AGENTS.md").as_str(), "AGENTS.md");
        assert_eq!(
            NormalizedPath::new(".speck").join("templates/story.md").as_str(),
            ".speck/templates/story.md"
        );
    }

    #[test]
    fn is_within_respects_segment_boundary() {
        let hooks_json = NormalizedPath::new(".cursor/hooks.json");
        let hook_script = NormalizedPath::new(".cursor/hooks/after-edit.sh");
        assert!(!hooks_json.is_within(".cursor/hooks"));
        assert!(hook_script.is_within(".cursor/hooks"));
        assert!(NormalizedPath::new(".speck").is_within(".speck"));
    }

    #[test]
    fn extension_ignores_dotfiles() {
        assert_eq!(NormalizedPath::new(".gitignore").extension(), None);
        assert_eq!(NormalizedPath::new("a/mcp.json").extension(), Some("json"));
        assert_eq!(NormalizedPath::new("config.TOML").extension(), Some("TOML"));
    }
}
