//! Structured-marker merge for instruction documents.
//!
//! The managed region of a document is delimited by two literal marker
//! lines. Everything outside the markers belongs to the user:
//!
//! ```text
//! # My project notes            <- user-owned, preserved
//!
//! <!-- SPECK:START -->
//! ...methodology instructions...  <- replaced on every sync
//! <!-- SPECK:END -->
//!
//! ## Team conventions           <- user-owned, preserved
//! ```

use crate::{MergeResult, MergeStrategy, MergeStrategyId};

/// Opening marker line of the managed region.
pub const START_MARKER: &str = "<!-- SPECK:START -->";

/// Closing marker line of the managed region.
pub const END_MARKER: &str = "<!-- SPECK:END -->";

/// Replaces the marker-delimited region and keeps user content around it.
#[derive(Debug, Clone)]
pub struct StructuredMarkerMerge {
    start: String,
    end: String,
}

impl StructuredMarkerMerge {
    /// Merge using the default `SPECK:START` / `SPECK:END` markers.
    pub fn new() -> Self {
        Self::with_markers(START_MARKER, END_MARKER)
    }

    /// Merge using custom marker lines.
    pub fn with_markers(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// The release content as a marker-delimited block.
    ///
    /// When the source carries its own markers only the text between them
    /// is managed; anything the release keeps outside its markers is never
    /// copied into the project. Stray marker lines inside the body are
    /// dropped so the block always has exactly one start and one end.
    pub fn managed_block(&self, source: &str) -> String {
        let region = match self.find_marker(source, &self.start, 0) {
            Some(start_offset) => {
                let rest = &source[start_offset..];
                let inner = rest.find('\n').map(|i| &rest[i + 1..]).unwrap_or("");
                match self.find_marker(inner, &self.end, 0) {
                    Some(end_offset) => &inner[..end_offset],
                    None => inner,
                }
            }
            None => source,
        };

        let body: Vec<&str> = region
            .lines()
            .filter(|line| line.trim() != self.start && line.trim() != self.end)
            .collect();
        let body = body.join("\n");
        format!("{}\n{}\n{}", self.start, trim_blank_lines(&body), self.end)
    }

    /// Split `target` into the user-owned text before and after the
    /// managed region.
    ///
    /// Without a start marker the whole document is user content and is
    /// returned as the "after" section. A start marker without a matching
    /// end marker makes the rest of the document managed.
    pub fn user_sections<'a>(&self, target: &'a str) -> (&'a str, &'a str) {
        let Some(start_offset) = self.find_marker(target, &self.start, 0) else {
            return ("", trim_blank_lines(target));
        };
        let before = trim_blank_lines(&target[..start_offset]);

        let after = match self.find_marker(target, &self.end, start_offset) {
            Some(end_offset) => {
                let rest = &target[end_offset..];
                let after_marker = rest.find('\n').map(|i| &rest[i + 1..]).unwrap_or("");
                trim_blank_lines(after_marker)
            }
            None => "",
        };

        (before, after)
    }

    /// Byte offset of the first line equal to `marker` at or after `from`.
    fn find_marker(&self, content: &str, marker: &str, from: usize) -> Option<usize> {
        let mut offset = 0;
        for line in content.split_inclusive('\n') {
            if offset >= from && line.trim() == marker {
                return Some(offset);
            }
            offset += line.len();
        }
        None
    }
}

impl Default for StructuredMarkerMerge {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeStrategy for StructuredMarkerMerge {
    fn id(&self) -> MergeStrategyId {
        MergeStrategyId::StructuredMarker
    }

    fn merge(&self, source: &str, target: Option<&str>) -> MergeResult {
        let Some(target) = target else {
            return MergeResult::create(source);
        };

        let (before, after) = self.user_sections(target);
        let managed = self.managed_block(source);

        let sections: Vec<&str> = [before, managed.as_str(), after]
            .into_iter()
            .filter(|section| !section.is_empty())
            .collect();

        let mut content = sections.join("\n\n");
        content.push('\n');
        MergeResult::merge(content)
    }
}

/// Strip leading and trailing whitespace-only lines, keeping indentation of
/// the first and last non-blank lines intact.
fn trim_blank_lines(content: &str) -> &str {
    let mut start = 0;
    for line in content.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        start += line.len();
    }
    let rest = &content[start..];
    let end = rest
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    &rest[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MergeAction;
    use pretty_assertions::assert_eq;

    fn wrap(body: &str) -> String {
        format!("{START_MARKER}\n{body}\n{END_MARKER}")
    }

    #[test]
    fn absent_target_creates_source_verbatim() {
        let result = StructuredMarkerMerge::new().merge("# Agents\n", None);
        assert_eq!(result, MergeResult::create("# Agents\n"));
    }

    #[test]
    fn replaces_managed_region_and_keeps_user_sections() {
        let target = format!(
            "# Project notes\n\n{}\n\n## Team rules\nUse tabs.\n",
            wrap("old instructions")
        );
        let source = wrap("new instructions");

        let result = StructuredMarkerMerge::new().merge(&source, Some(&target));

        assert_eq!(result.action, MergeAction::Merge);
        assert_eq!(
            result.content.unwrap(),
            format!(
                "# Project notes\n\n{}\n\n## Team rules\nUse tabs.\n",
                wrap("new instructions")
            )
        );
    }

    #[test]
    fn unmarked_source_gets_wrapped() {
        let merger = StructuredMarkerMerge::new();
        assert_eq!(merger.managed_block("\nbody\n\n"), wrap("body"));
    }

    #[test]
    fn release_text_outside_its_markers_is_not_managed() {
        let merger = StructuredMarkerMerge::new();
        let source = format!("# Agents\n\n{}\n\nfooter\n", wrap("rules"));

        assert_eq!(merger.managed_block(&source), wrap("rules"));

        let once = merger.merge(&source, Some("my notes\n")).content.unwrap();
        let twice = merger.merge(&source, Some(&once)).content.unwrap();
        assert_eq!(once, format!("{}\n\nmy notes\n", wrap("rules")));
        assert_eq!(twice, once);
    }

    #[test]
    fn target_without_markers_is_kept_after_managed_block() {
        let result = StructuredMarkerMerge::new().merge(&wrap("speck"), Some("my own notes\n"));
        assert_eq!(
            result.content.unwrap(),
            format!("{}\n\nmy own notes\n", wrap("speck"))
        );
    }

    #[test]
    fn missing_end_marker_treats_tail_as_managed() {
        let target = format!("intro\n{START_MARKER}\nstale\nstale again\n");
        let result = StructuredMarkerMerge::new().merge(&wrap("fresh"), Some(&target));
        assert_eq!(result.content.unwrap(), format!("intro\n\n{}\n", wrap("fresh")));
    }

    #[test]
    fn unchanged_content_still_reports_merge() {
        let merged = format!("{}\n", wrap("same"));
        let result = StructuredMarkerMerge::new().merge(&wrap("same"), Some(&merged));
        assert_eq!(result.action, MergeAction::Merge);
        assert_eq!(result.content.as_deref(), Some(merged.as_str()));
    }

    #[test]
    fn trim_blank_lines_keeps_inner_indentation() {
        assert_eq!(trim_blank_lines("\n  \n  indented\nlast  \n\n"), "  indented\nlast");
        assert_eq!(trim_blank_lines("\n\n"), "");
    }
}
