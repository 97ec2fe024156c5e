//! End-to-end upgrade scenarios
//!
//! Each test builds a release tree and a project tree on disk, runs a full
//! sync and checks both the reported outcome and the files left behind.

use pretty_assertions::assert_eq;
use serde_json::Value;
use speck_core::{
    IgnoreList, LegacySync, ReleaseTree, SmartSync, SyncOptions, VersionMarker, VersionStore,
};
use speck_fs::LocalFs;
use speck_test_utils::{FaultyFs, TestTree};

const AGENTS_RELEASE: &str = "<!-- SPECK:START -->\n# Speck v2 rules\n<!-- SPECK:END -->\n";

fn load(release: &TestTree) -> ReleaseTree {
    ReleaseTree::load(&LocalFs::new(), release.root()).unwrap()
}

/// A release with a file in every tier plus excluded repository files.
fn release_v2() -> TestTree {
    TestTree::new()
        .with_file(".speck/templates/story.md", "# Story v2\n")
        .with_file(".speck/templates/epic.md", "# Epic v2\n")
        .with_file(".speck/scripts/check.sh", "#!/bin/sh\necho v2\n")
        .with_file(".cursor/commands/speck.md", "speck v2\n")
        .with_file(".github/copilot-instructions.md", "v2 instructions\n")
        .with_file("AGENTS.md", AGENTS_RELEASE)
        .with_file(".gitignore", "node_modules\n.speck/cache/\n")
        .with_file(
            ".cursor/mcp.json",
            r#"{"mcpServers": {"speck": {"command": "speck-mcp"}}}"#,
        )
        .with_file("specs/README.md", "# Specifications\n\nv2\n")
        .with_file("README.md", "# Speck methodology\n")
        .with_file("src/cli.js", "// cli\n")
        .with_file("package.json", "{\"name\": \"speck\"}\n")
}

// =============================================================================
// Fresh install
// =============================================================================

#[test]
fn fresh_install_creates_methodology_files_only() {
    let release = release_v2();
    let project = TestTree::new();

    let outcome = SmartSync::local(project.root()).run(&load(&release));

    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.created.len(), 8);
    assert!(outcome.updated.is_empty());
    assert!(outcome.merged.is_empty());
    for path in [
        ".speck/templates/story.md",
        ".speck/templates/epic.md",
        ".speck/scripts/check.sh",
        ".cursor/commands/speck.md",
        ".github/copilot-instructions.md",
        "AGENTS.md",
        ".gitignore",
        "specs/README.md",
    ] {
        project.assert_file_exists(path);
    }
    for path in ["README.md", "src/cli.js", "package.json", ".cursor/mcp.json"] {
        project.assert_file_not_exists(path);
    }
}

// =============================================================================
// Upgrading a customized project
// =============================================================================

#[test]
fn upgrade_preserves_every_customization() {
    let release = release_v2();
    let project = TestTree::new()
        .with_file(".speck/templates/story.md", "# Story v1\n")
        .with_file(".speck/templates/removed.md", "# Gone in v2\n")
        .with_file(
            "AGENTS.md",
            "# Acme\n\n<!-- SPECK:START -->\nv1 rules\n<!-- SPECK:END -->\n\n## Our conventions\n",
        )
        .with_file(".gitignore", "dist\nnode_modules\n")
        .with_file(
            ".cursor/mcp.json",
            r#"{"mcpServers": {"speck": {"command": "custom-speck"}, "db": {"command": "db"}}}"#,
        )
        .with_file("specs/README.md", "# Acme product specs\n")
        .with_file("README.md", "# Acme\n");

    let outcome = SmartSync::local(project.root()).run(&load(&release));
    assert!(outcome.errors.is_empty());

    assert_eq!(project.read(".speck/templates/story.md"), "# Story v2\n");
    project.assert_file_not_exists(".speck/templates/removed.md");
    assert!(outcome.removed.contains(&".speck/templates/removed.md".to_string()));

    assert_eq!(
        project.read("AGENTS.md"),
        "# Acme\n\n<!-- SPECK:START -->\n# Speck v2 rules\n<!-- SPECK:END -->\n\n## Our conventions\n"
    );

    project.assert_file_contains(".gitignore", ".speck/cache/");
    let gitignore = project.read(".gitignore");
    assert!(gitignore.starts_with("dist\nnode_modules\n"));
    assert_eq!(gitignore.matches("node_modules").count(), 1);

    let mcp: Value = serde_json::from_str(&project.read(".cursor/mcp.json")).unwrap();
    assert_eq!(mcp["mcpServers"]["speck"]["command"], "custom-speck");
    assert_eq!(mcp["mcpServers"]["db"]["command"], "db");

    assert_eq!(project.read("specs/README.md"), "# Acme product specs\n");
    assert_eq!(project.read("README.md"), "# Acme\n");
}

#[test]
fn missing_mcp_config_is_skipped_and_not_created() {
    let release = release_v2();
    let project = TestTree::new().with_file("AGENTS.md", AGENTS_RELEASE);

    let outcome = SmartSync::local(project.root()).run(&load(&release));

    assert!(outcome.skipped.contains(&".cursor/mcp.json".to_string()));
    project.assert_file_not_exists(".cursor/mcp.json");
}

// =============================================================================
// Failure isolation
// =============================================================================

#[test]
fn one_unwritable_file_does_not_abort_the_sync() {
    let release = release_v2();
    let project = TestTree::new();
    let fs = FaultyFs::new().fail_write(project.root().join(".github/copilot-instructions.md"));

    let outcome = SmartSync::new(fs, project.root()).run(&load(&release));

    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].path, ".github/copilot-instructions.md");
    assert_eq!(outcome.created.len(), 7);
    project.assert_file_exists("AGENTS.md");
    project.assert_file_exists("specs/README.md");
}

// =============================================================================
// Repeatability
// =============================================================================

#[test]
fn second_sync_changes_no_content() {
    let release = release_v2();
    let project = TestTree::new().with_file(".gitignore", "dist\n");
    let sync = SmartSync::local(project.root());

    sync.run(&load(&release));
    let after_first = project.files();
    let contents: Vec<String> = after_first.iter().map(|p| project.read(p)).collect();

    let second = sync.run(&load(&release));

    assert_eq!(project.files(), after_first);
    let again: Vec<String> = after_first.iter().map(|p| project.read(p)).collect();
    assert_eq!(again, contents);
    assert!(second.created.is_empty());
    assert!(second.removed.is_empty());
    assert!(second.skipped.contains(&".gitignore".to_string()));
}

#[test]
fn dry_run_reports_exactly_what_execution_does() {
    let release = release_v2();
    let project = TestTree::new()
        .with_file(".speck/templates/old.md", "old\n")
        .with_file("AGENTS.md", "<!-- SPECK:START -->\nv1\n<!-- SPECK:END -->\n");
    let sync = SmartSync::local(project.root());
    let before = project.files();

    let preview = sync.sync(&load(&release), &SyncOptions { dry_run: true });
    assert_eq!(project.files(), before);

    let applied = sync.sync(&load(&release), &SyncOptions { dry_run: false });
    assert_eq!(preview, applied);
}

// =============================================================================
// Legacy mode and version recording
// =============================================================================

#[test]
fn legacy_mode_never_touches_repository_files() {
    let release = release_v2().with_file("docs/guide.md", "guide\n");
    let project = TestTree::new().with_file(".speckignore", "# local\ndocs/**\n");

    let ignore = IgnoreList::for_project(&LocalFs::new(), project.root(), ["**/*.sh"]).unwrap();
    let outcome = LegacySync::new(LocalFs::new(), project.root(), ignore).run(&load(&release));

    assert!(outcome.errors.is_empty());
    for path in ["README.md", "src/cli.js", "package.json", "docs/guide.md", ".speck/scripts/check.sh"] {
        project.assert_file_not_exists(path);
    }
    project.assert_file_exists(".speck/templates/story.md");
    project.assert_file_exists(".cursor/mcp.json");
}

#[test]
fn recorded_version_survives_subtree_replacement() {
    let release = release_v2();
    let project = TestTree::new();
    let store = VersionStore::local(project.root());

    SmartSync::local(project.root()).run(&load(&release));
    store.write_version(&VersionMarker::new("v2.0.0")).unwrap();
    assert_eq!(project.read(".speck/VERSION"), "v2.0.0");

    let outcome = SmartSync::local(project.root()).run(&load(&release));

    assert!(!outcome.removed.contains(&".speck/VERSION".to_string()));
    assert_eq!(store.read_version().unwrap(), Some("v2.0.0".into()));
}
