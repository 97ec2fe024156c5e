//! Console rendering of plans, outcomes and changelogs.

use std::collections::BTreeMap;
use std::path::Path;

use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use speck_core::{LegacyPlan, Operation, SyncOutcome, SyncPlan};
use speck_release::ChangelogEntry;

/// Lines added and removed per path.
pub type DiffStats = BTreeMap<String, (usize, usize)>;

const LIST_LIMIT: usize = 20;
const CHANGELOG_LINES: usize = 5;

/// Count inserted and deleted lines between two texts.
pub fn line_changes(old: &str, new: &str) -> (usize, usize) {
    let diff = TextDiff::from_lines(old, new);
    diff.iter_all_changes()
        .fold((0, 0), |(added, removed), change| match change.tag() {
            ChangeTag::Insert => (added + 1, removed),
            ChangeTag::Delete => (added, removed + 1),
            ChangeTag::Equal => (added, removed),
        })
}

fn existing_text(root: &Path, path: &str) -> Option<String> {
    std::fs::read(root.join(path))
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

/// Diff stats for every planned write over an existing file.
pub fn smart_diff_stats(plan: &SyncPlan, root: &Path) -> DiffStats {
    let mut stats = DiffStats::new();
    for step in plan.steps() {
        if let Operation::Write { content, .. } = &step.operation
            && let Some(old) = existing_text(root, step.path.as_str())
        {
            let new = String::from_utf8_lossy(content);
            stats.insert(step.path.to_string(), line_changes(&old, &new));
        }
    }
    stats
}

/// Diff stats for the files a legacy plan overwrites.
pub fn legacy_diff_stats(plan: &LegacyPlan, root: &Path) -> DiffStats {
    let mut stats = DiffStats::new();
    for entry in &plan.update {
        if let Some(old) = existing_text(root, entry.path.as_str()) {
            let new = String::from_utf8_lossy(&entry.content);
            stats.insert(entry.path.to_string(), line_changes(&old, &new));
        }
    }
    stats
}

fn print_list(title: &str, marker: colored::ColoredString, paths: &[String], stats: &DiffStats) {
    if paths.is_empty() {
        return;
    }
    println!("{} {}:", "=>".blue().bold(), title);
    for path in paths.iter().take(LIST_LIMIT) {
        match stats.get(path) {
            Some((added, removed)) => println!(
                "   {} {} {}",
                marker,
                path.cyan(),
                format!("(+{added} -{removed})").dimmed()
            ),
            None => println!("   {} {}", marker, path.cyan()),
        }
    }
    if paths.len() > LIST_LIMIT {
        println!("   ... and {} more", paths.len() - LIST_LIMIT);
    }
}

/// Print what a sync will do.
pub fn print_preview(outcome: &SyncOutcome, stats: &DiffStats) {
    print_list("New files", "+".green(), &outcome.created, stats);
    print_list("Files to update", "~".yellow(), &outcome.updated, stats);
    print_list("Files to merge", "*".blue(), &outcome.merged, stats);
    print_list("Files to remove", "-".red(), &outcome.removed, stats);
    if !outcome.skipped.is_empty() {
        println!(
            "{} Skipped {} file(s): {}",
            "=>".blue().bold(),
            outcome.skipped.len(),
            outcome.skipped.join(", ").dimmed()
        );
    }
    print_warnings(outcome);
    if outcome.has_errors() {
        print_errors(outcome);
    }
    println!();
    print_summary(outcome);
}

pub fn print_summary(outcome: &SyncOutcome) {
    println!(
        "Summary: {} new, {} updated, {} merged, {} removed, {} skipped, {} unchanged",
        outcome.created.len(),
        outcome.updated.len(),
        outcome.merged.len(),
        outcome.removed.len(),
        outcome.skipped.len(),
        outcome.unchanged.len()
    );
}

pub fn print_warnings(outcome: &SyncOutcome) {
    for warning in &outcome.warnings {
        println!(
            "{} {}: {}",
            "WARN".yellow().bold(),
            warning.path.cyan(),
            warning.message
        );
    }
}

pub fn print_errors(outcome: &SyncOutcome) {
    println!("{} Some files failed:", "FAILED".red().bold());
    for error in &outcome.errors {
        println!("   {} {}: {}", "!".red(), error.path.cyan(), error.message);
    }
}

/// Print release notes, limited to the first lines of each body.
pub fn print_changelog(entries: Option<&[ChangelogEntry]>) {
    println!("{} Changes between versions:", "=>".blue().bold());
    let Some(entries) = entries.filter(|entries| !entries.is_empty()) else {
        println!("   (changelog not available)");
        return;
    };
    for entry in entries {
        println!();
        println!(
            "   {}: {}",
            entry.version.green().bold(),
            entry.name.as_deref().unwrap_or(&entry.version)
        );
        let summary = entry.summary(CHANGELOG_LINES);
        for line in &summary {
            println!("     {line}");
        }
        let total = entry
            .body
            .as_deref()
            .map_or(0, |body| body.lines().filter(|l| !l.trim().is_empty()).count());
        if total > summary.len() {
            println!("     ...");
        }
    }
    println!();
}
