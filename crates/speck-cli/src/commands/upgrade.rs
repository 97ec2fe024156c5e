//! Upgrade command implementation

use colored::Colorize;
use speck_core::VersionMarker;
use speck_release::ReleaseProvider;
use tracing::debug;

use crate::cli::SyncArgs;
use crate::context::Context;
use crate::error::Result;

use super::{PlannedRelease, apply, fail_on_errors, report};

/// Target keyword that resolves to the newest release.
pub const LATEST: &str = "latest";

/// Move an initialized project to `version` (or the latest release).
pub async fn run_upgrade(ctx: &Context, version: &str, args: &SyncArgs) -> Result<()> {
    let Some(current) = ctx.current_version()? else {
        println!(
            "{} No Speck version found in this project.",
            "NOTE".yellow().bold()
        );
        println!("Run {} first.", "speck init".cyan());
        return Ok(());
    };
    println!("   Current version: {}", current.as_str().cyan());

    println!("{} Fetching release information...", "=>".blue().bold());
    let target = if version == LATEST {
        ctx.provider.latest_release().await?
    } else {
        ctx.provider.release_by_tag(version).await?
    };
    println!("   Target version: {}", target.tag.green().bold());

    if current == *target.tag.as_str() {
        println!();
        println!(
            "{} Already up to date ({})",
            "OK".green().bold(),
            current.as_str().green()
        );
        return Ok(());
    }

    println!();
    let changelog = match ctx.provider.changelog(current.as_str(), &target.tag).await {
        Ok(entries) => entries,
        Err(e) => {
            debug!(error = %e, "changelog unavailable");
            None
        }
    };
    report::print_changelog(changelog.as_deref());

    let extracted = ctx.provider.extract_release(&target.tag).await?;
    let planned = PlannedRelease::new(ctx, extracted.path(), args)?;
    let preview = planned.preview();
    report::print_preview(&preview, &planned.diff_stats(&ctx.root));

    if args.dry_run {
        println!();
        println!("{} Dry run, no files were changed.", "=>".blue().bold());
        return Ok(());
    }
    if preview.is_noop() {
        println!();
        println!("{} No changes needed.", "OK".green().bold());
        return Ok(());
    }

    let outcome = apply(ctx, planned, &VersionMarker::new(target.tag.as_str()))?;

    println!();
    println!(
        "{} Upgraded {} -> {}",
        "OK".green().bold(),
        current.as_str().dimmed(),
        target.tag.green()
    );

    fail_on_errors(&outcome)
}
