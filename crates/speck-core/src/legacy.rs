//! Ignore-list sync
//!
//! The first sync mode Speck shipped: every release file that does not
//! match an ignore pattern is copied over wholesale. Kept for projects
//! that want the old behaviour via `--legacy`.

use std::path::{Path, PathBuf};

use regex::Regex;
use speck_fs::{FileSystem, LocalFs, NormalizedPath, SpeckPath};
use tracing::{debug, warn};

use crate::{Error, FileEntry, ReleaseTree, Result, SyncOutcome};

/// Patterns that are never copied from the template.
pub const DEFAULT_IGNORE: &[&str] = &[
    "specs/**",
    "src/**",
    "README.md",
    ".git/**",
    ".gitignore",
    "node_modules/**",
    "package.json",
    "package-lock.json",
    ".env*",
    "copilot-setup-steps.yml",
];

/// Translate a glob into an anchored regex.
///
/// `**` matches across directories, `*` stays within one segment and `?`
/// matches a single character. Everything else is literal.
pub fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut regex = String::from("^");
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                regex.push_str(".*");
            }
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push('.'),
            other => regex.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    regex.push('$');

    Regex::new(&regex).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Compiled ignore patterns.
#[derive(Debug, Clone)]
pub struct IgnoreList {
    patterns: Vec<(String, Regex)>,
}

impl IgnoreList {
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// The built-in defaults.
    pub fn defaults() -> Result<Self> {
        let mut list = Self::empty();
        list.extend(DEFAULT_IGNORE.iter().copied())?;
        Ok(list)
    }

    /// Defaults, then the project's `.speckignore`, then `extra`.
    pub fn for_project<'a>(
        fs: &impl FileSystem,
        target: &Path,
        extra: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let mut list = Self::defaults()?;
        if let Some(bytes) = fs.read_optional(&target.join(SpeckPath::IgnoreFile.as_str()))? {
            let content = String::from_utf8_lossy(&bytes);
            list.extend(parse_ignore_file(&content))?;
        }
        list.extend(extra)?;
        Ok(list)
    }

    pub fn extend<'a>(&mut self, patterns: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for pattern in patterns {
            self.patterns
                .push((pattern.to_string(), glob_to_regex(pattern)?));
        }
        Ok(())
    }

    pub fn is_ignored(&self, path: &NormalizedPath) -> bool {
        self.patterns
            .iter()
            .any(|(_, regex)| regex.is_match(path.as_str()))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|(pattern, _)| pattern.as_str())
    }
}

/// Non-blank, non-comment lines of a `.speckignore` file.
pub fn parse_ignore_file(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

/// Result of planning an ignore-list sync.
#[derive(Debug, Clone, Default)]
pub struct LegacyPlan {
    pub create: Vec<FileEntry>,
    pub update: Vec<FileEntry>,
    pub skip: Vec<NormalizedPath>,
    pub unchanged: Vec<NormalizedPath>,
    pub failed: Vec<(NormalizedPath, String)>,
}

impl LegacyPlan {
    /// The outcome executing this plan would produce.
    pub fn preview(&self) -> SyncOutcome {
        let mut outcome = self.base_outcome();
        outcome
            .created
            .extend(self.create.iter().map(|entry| entry.path.to_string()));
        outcome
            .updated
            .extend(self.update.iter().map(|entry| entry.path.to_string()));
        outcome
    }

    fn base_outcome(&self) -> SyncOutcome {
        let mut outcome = SyncOutcome::new();
        outcome.skipped = self.skip.iter().map(ToString::to_string).collect();
        outcome.unchanged = self.unchanged.iter().map(ToString::to_string).collect();
        for (path, message) in &self.failed {
            outcome.error(path.as_str(), message.clone());
        }
        outcome
    }
}

/// Wholesale copy of every non-ignored release file.
pub struct LegacySync<F: FileSystem = LocalFs> {
    fs: F,
    target: PathBuf,
    ignore: IgnoreList,
}

impl<F: FileSystem> LegacySync<F> {
    pub fn new(fs: F, target: impl Into<PathBuf>, ignore: IgnoreList) -> Self {
        Self {
            fs,
            target: target.into(),
            ignore,
        }
    }

    pub fn plan(&self, release: &ReleaseTree) -> LegacyPlan {
        let mut plan = LegacyPlan::default();
        for entry in release.files() {
            if self.ignore.is_ignored(&entry.path) {
                debug!(path = %entry.path, "ignored");
                plan.skip.push(entry.path.clone());
                continue;
            }
            match self.fs.read_optional(&self.target.join(entry.path.to_native())) {
                Ok(None) => plan.create.push(entry.clone()),
                Ok(Some(existing)) if existing != entry.content => plan.update.push(entry.clone()),
                Ok(Some(_)) => plan.unchanged.push(entry.path.clone()),
                Err(e) => plan.failed.push((entry.path.clone(), e.to_string())),
            }
        }
        plan
    }

    pub fn execute(&self, plan: LegacyPlan) -> SyncOutcome {
        let mut outcome = plan.base_outcome();
        let writes = plan
            .create
            .into_iter()
            .map(|entry| (entry, true))
            .chain(plan.update.into_iter().map(|entry| (entry, false)));

        for (entry, created) in writes {
            let path = self.target.join(entry.path.to_native());
            match self.fs.write(&path, &entry.content) {
                Ok(()) if created => outcome.created.push(entry.path.to_string()),
                Ok(()) => outcome.updated.push(entry.path.to_string()),
                Err(e) => {
                    warn!(path = %entry.path, error = %e, "file operation failed");
                    outcome.error(entry.path.as_str(), e.to_string());
                }
            }
        }
        outcome
    }

    pub fn run(&self, release: &ReleaseTree) -> SyncOutcome {
        self.execute(self.plan(release))
    }
}
