//! Property tests for the text merge strategies.

use proptest::prelude::*;
use speck_merge::marker::{END_MARKER, START_MARKER};
use speck_merge::{MergeAction, MergeRegistry, MergeStrategyId};
use std::collections::HashSet;

fn prose() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]([a-z ]{0,18}[a-z])?", 1..5).prop_map(|lines| lines.join("\n"))
}

fn wrap(body: &str) -> String {
    format!("{START_MARKER}\n{body}\n{END_MARKER}")
}

fn ignore_lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z./*]{1,8}", 0..8)
}

proptest! {
    #[test]
    fn marker_merge_preserves_user_sections(
        before in prose(),
        after in prose(),
        old_body in prose(),
        new_body in prose(),
    ) {
        let registry = MergeRegistry::new();
        let merger = registry.get(MergeStrategyId::StructuredMarker);
        let target = format!("{before}\n\n{}\n\n{after}\n", wrap(&old_body));

        let result = merger.merge(&wrap(&new_body), Some(&target));

        prop_assert_eq!(result.action, MergeAction::Merge);
        prop_assert_eq!(
            result.content.unwrap(),
            format!("{before}\n\n{}\n\n{after}\n", wrap(&new_body))
        );
    }

    #[test]
    fn marker_merge_is_stable_across_runs(before in prose(), first in prose(), second in prose()) {
        let registry = MergeRegistry::new();
        let merger = registry.get(MergeStrategyId::StructuredMarker);
        let target = format!("{before}\n\n{}\n", wrap("initial"));

        let once = merger.merge(&wrap(&first), Some(&target)).content.unwrap();
        let twice = merger.merge(&wrap(&second), Some(&once)).content.unwrap();

        let expected_prefix = format!("{before}\n\n{START_MARKER}\n");
        prop_assert!(twice.starts_with(&expected_prefix));
        prop_assert!(twice.contains(&second));
    }

    #[test]
    fn marker_merge_is_idempotent_when_release_wraps_its_own_markers(
        release_header in prose(),
        release_footer in prose(),
        body in prose(),
        user in prose(),
    ) {
        let registry = MergeRegistry::new();
        let merger = registry.get(MergeStrategyId::StructuredMarker);
        let source = format!("{release_header}\n\n{}\n\n{release_footer}\n", wrap(&body));

        let once = merger.merge(&source, Some(&format!("{user}\n"))).content.unwrap();
        let twice = merger.merge(&source, Some(&once)).content.unwrap();

        prop_assert_eq!(&once, &format!("{}\n\n{user}\n", wrap(&body)));
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn line_set_merge_is_a_superset_and_idempotent(target in ignore_lines(), source in ignore_lines()) {
        let registry = MergeRegistry::new();
        let merger = registry.get(MergeStrategyId::LineSet);
        let target_text = format!("{}\n", target.join("\n"));
        let source_text = format!("{}\n", source.join("\n"));

        let result = merger.merge(&source_text, Some(&target_text));
        let content = result.content.clone().unwrap();

        // Original lines stay first, in their original order.
        prop_assert!(content.starts_with(target_text.trim_end_matches('\n')));

        let merged: HashSet<&str> = content.lines().filter(|l| !l.starts_with('#') && !l.is_empty()).collect();
        let expected: HashSet<&str> = target.iter().chain(&source).map(String::as_str).collect();
        prop_assert_eq!(merged, expected);

        let again = merger.merge(&source_text, Some(&content));
        prop_assert_eq!(again.action, MergeAction::Skip);
    }
}
