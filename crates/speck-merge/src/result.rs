//! The value every merge strategy returns.

use std::fmt;

/// What the executor should do with a merge result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeAction {
    /// Target was absent; write the content as a new file
    Create,
    /// Target existed and was combined with the release content
    Merge,
    /// Target is replaced wholesale
    Update,
    /// Write nothing
    Skip,
}

impl fmt::Display for MergeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Merge => write!(f, "merge"),
            Self::Update => write!(f, "update"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// Result of reconciling release content with project content.
///
/// `content` is `None` when there is nothing to write. A `Skip` may still
/// carry the untouched target content (the line-set merge does this), but
/// the executor never writes on `Skip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub content: Option<String>,
    pub action: MergeAction,
    /// Set when the strategy recovered from malformed input
    pub warning: Option<String>,
}

impl MergeResult {
    pub fn create(content: impl Into<String>) -> Self {
        Self::with_content(content, MergeAction::Create)
    }

    pub fn merge(content: impl Into<String>) -> Self {
        Self::with_content(content, MergeAction::Merge)
    }

    pub fn update(content: impl Into<String>) -> Self {
        Self::with_content(content, MergeAction::Update)
    }

    /// Nothing to write.
    pub fn skip() -> Self {
        Self {
            content: None,
            action: MergeAction::Skip,
            warning: None,
        }
    }

    /// Nothing to write; the existing content is already complete.
    pub fn unchanged(existing: impl Into<String>) -> Self {
        Self::with_content(existing, MergeAction::Skip)
    }

    /// Attach a warning describing a recovered parse failure.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    fn with_content(content: impl Into<String>, action: MergeAction) -> Self {
        Self {
            content: Some(content.into()),
            action,
            warning: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_is_a_skip_carrying_existing_content() {
        let result = MergeResult::unchanged("node_modules\n");
        assert_eq!(result.action, MergeAction::Skip);
        assert_eq!(result.content.as_deref(), Some("node_modules\n"));
    }

    #[test]
    fn warning_is_attached() {
        let result = MergeResult::skip().with_warning("bad json");
        assert_eq!(result.warning.as_deref(), Some("bad json"));
    }
}
