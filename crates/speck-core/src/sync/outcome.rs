//! Structured result of a sync.

use serde::Serialize;

/// Error attached to one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    pub path: String,
    pub message: String,
}

/// Non-fatal note attached to one path, such as a recovered parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileWarning {
    pub path: String,
    pub message: String,
}

/// What a sync did, or would do, to the project.
///
/// A path lands in at most one of the action lists. It may additionally
/// appear in `errors` when a later step on the same path failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub merged: Vec<String>,
    pub removed: Vec<String>,
    pub skipped: Vec<String>,
    pub unchanged: Vec<String>,
    pub errors: Vec<FileError>,
    pub warnings: Vec<FileWarning>,
}

impl SyncOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of paths whose on-disk content changes.
    pub fn change_count(&self) -> usize {
        self.created.len() + self.updated.len() + self.merged.len() + self.removed.len()
    }

    /// True when applying the sync would leave the project untouched.
    pub fn is_noop(&self) -> bool {
        self.change_count() == 0 && self.errors.is_empty()
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FileError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub(crate) fn warning(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(FileWarning {
            path: path.into(),
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_outcome_is_noop() {
        let outcome = SyncOutcome::new();
        assert!(outcome.is_noop());
        assert!(!outcome.has_errors());
    }

    #[test]
    fn skipped_and_unchanged_do_not_count_as_changes() {
        let outcome = SyncOutcome {
            skipped: vec![".cursor/mcp.json".into()],
            unchanged: vec![".speckrc".into()],
            ..Default::default()
        };
        assert_eq!(outcome.change_count(), 0);
        assert!(outcome.is_noop());
    }

    #[test]
    fn errors_prevent_noop() {
        let mut outcome = SyncOutcome::new();
        outcome.error("AGENTS.md", "permission denied");
        assert!(!outcome.is_noop());
        assert_eq!(outcome.errors[0].path, "AGENTS.md");
    }
}
