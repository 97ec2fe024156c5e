//! Line-set merge for ignore-style files.
//!
//! Files are compared as sets of significant lines (not blank, not a
//! comment). Missing release lines are appended under a marked section;
//! the user's lines and their order are never touched.

use std::collections::HashSet;

use crate::{MergeResult, MergeStrategy, MergeStrategyId};

/// Header written above lines appended by a merge.
pub const SECTION_HEADER: &str = "# Added by speck";

/// Appends release lines the project file is missing.
#[derive(Debug, Clone)]
pub struct LineSetMerge {
    comment_prefix: String,
}

impl LineSetMerge {
    /// Merge with `#` as the comment marker.
    pub fn new() -> Self {
        Self::with_comment_prefix("#")
    }

    pub fn with_comment_prefix(prefix: impl Into<String>) -> Self {
        Self {
            comment_prefix: prefix.into(),
        }
    }

    /// Significant lines of `content`, trimmed, in order.
    pub fn significant_lines<'a>(&'a self, content: &'a str) -> impl Iterator<Item = &'a str> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(self.comment_prefix.as_str()))
    }

    /// Source lines absent from `target`, in source order, without repeats.
    pub fn missing_lines<'a>(&'a self, source: &'a str, target: &'a str) -> Vec<&'a str> {
        let mut seen: HashSet<&str> = self.significant_lines(target).collect();
        self.significant_lines(source)
            .filter(|line| seen.insert(*line))
            .collect()
    }
}

impl Default for LineSetMerge {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeStrategy for LineSetMerge {
    fn id(&self) -> MergeStrategyId {
        MergeStrategyId::LineSet
    }

    fn merge(&self, source: &str, target: Option<&str>) -> MergeResult {
        let Some(target) = target else {
            return MergeResult::create(source);
        };

        let missing = self.missing_lines(source, target);
        if missing.is_empty() {
            return MergeResult::unchanged(target);
        }

        let mut content = target.trim_end_matches(['\n', '\r']).to_string();
        if !content.is_empty() {
            content.push_str("\n\n");
        }
        content.push_str(SECTION_HEADER);
        content.push('\n');
        for line in missing {
            content.push_str(line);
            content.push('\n');
        }

        MergeResult::merge(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MergeAction;
    use pretty_assertions::assert_eq;

    #[test]
    fn absent_target_creates_source() {
        let result = LineSetMerge::new().merge("node_modules\n", None);
        assert_eq!(result, MergeResult::create("node_modules\n"));
    }

    #[test]
    fn appends_missing_lines_under_header() {
        let result =
            LineSetMerge::new().merge("node_modules\n.speck/cache/\n", Some("node_modules\n"));

        assert_eq!(result.action, MergeAction::Merge);
        assert_eq!(
            result.content.unwrap(),
            "node_modules\n\n# Added by speck\n.speck/cache/\n"
        );
    }

    #[test]
    fn superset_target_is_skipped_not_updated() {
        let target = "# mine\ndist/\nnode_modules\n.env\n";
        let result = LineSetMerge::new().merge("node_modules\n# comment\n\n.env\n", Some(target));

        assert_eq!(result.action, MergeAction::Skip);
        assert_eq!(result.content.as_deref(), Some(target));
    }

    #[test]
    fn comparison_ignores_surrounding_whitespace_and_comments() {
        let merger = LineSetMerge::new();
        let missing = merger.missing_lines("  dist/  \n# dist\nbuild\nbuild\n", "dist/\n");
        assert_eq!(missing, vec!["build"]);
    }

    #[test]
    fn empty_target_gets_only_the_section() {
        let result = LineSetMerge::new().merge("a\n", Some(""));
        assert_eq!(result.content.unwrap(), "# Added by speck\na\n");
    }
}
