//! Ignore-list sync against temporary directories.

use pretty_assertions::assert_eq;
use speck_core::{IgnoreList, LegacySync, ReleaseTree};
use speck_fs::LocalFs;
use speck_test_utils::{FaultyFs, TestTree};

fn release() -> TestTree {
    TestTree::new()
        .with_file(".speck/templates/story.md", "# Story\n")
        .with_file("AGENTS.md", "agents\n")
        .with_file("README.md", "# Speck\n")
        .with_file("src/cli.js", "cli\n")
        .with_file("docs/guide.md", "guide\n")
}

#[test]
fn defaults_never_copy_readme_or_sources() {
    let release = release();
    let project = TestTree::new();
    let tree = ReleaseTree::load(&LocalFs::new(), release.root()).unwrap();

    let sync = LegacySync::new(LocalFs::new(), project.root(), IgnoreList::defaults().unwrap());
    let outcome = sync.run(&tree);

    assert_eq!(
        outcome.created,
        vec![".speck/templates/story.md", "AGENTS.md", "docs/guide.md"]
    );
    assert_eq!(outcome.skipped, vec!["README.md", "src/cli.js"]);
    project.assert_file_not_exists("README.md");
    project.assert_file_not_exists("src/cli.js");
}

#[test]
fn speckignore_and_extra_patterns_are_honoured() {
    let release = release();
    let project = TestTree::new()
        .with_file(".speckignore", "# local docs\ndocs/**\n")
        .with_file("AGENTS.md", "agents\n");
    let tree = ReleaseTree::load(&LocalFs::new(), release.root()).unwrap();

    let ignore = IgnoreList::for_project(&LocalFs::new(), project.root(), [".speck/**"]).unwrap();
    let plan = LegacySync::new(LocalFs::new(), project.root(), ignore).plan(&tree);

    assert!(plan.create.is_empty());
    assert!(plan.update.is_empty());
    assert_eq!(plan.unchanged.len(), 1);
    assert_eq!(plan.skip.len(), 4);
}

#[test]
fn preview_matches_execution_and_failures_are_isolated() {
    let release = release();
    let project = TestTree::new().with_file("AGENTS.md", "old\n");
    let tree = ReleaseTree::load(&LocalFs::new(), release.root()).unwrap();
    let fs = FaultyFs::new().fail_write(project.root().join("docs/guide.md"));

    let sync = LegacySync::new(fs, project.root(), IgnoreList::defaults().unwrap());
    let plan = sync.plan(&tree);
    let preview = plan.preview();
    let outcome = sync.execute(plan);

    assert_eq!(preview.updated, vec!["AGENTS.md"]);
    assert_eq!(outcome.updated, vec!["AGENTS.md"]);
    assert_eq!(outcome.created, vec![".speck/templates/story.md"]);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].path, "docs/guide.md");
}
