//! Init command implementation

use colored::Colorize;
use speck_core::VersionMarker;
use speck_fs::SpeckPath;
use speck_release::ReleaseProvider;

use crate::cli::SyncArgs;
use crate::context::Context;
use crate::error::Result;

use super::{PlannedRelease, apply, fail_on_errors, report};

/// Install the latest release into a project.
///
/// Refuses to touch a project that already has Speck files unless `force`
/// is set; that refusal is not an error.
pub async fn run_init(ctx: &Context, force: bool, args: &SyncArgs) -> Result<()> {
    let existing = [SpeckPath::AgentsFile, SpeckPath::SpeckDir]
        .into_iter()
        .find(|path| ctx.root.join(path.as_str()).exists());
    if let Some(path) = existing
        && !force
    {
        println!(
            "{} {} already exists. Speck appears to be initialized.",
            "NOTE".yellow().bold(),
            path.as_str().cyan()
        );
        println!(
            "Run {} to update, or {} to reinitialize.",
            "speck upgrade".cyan(),
            "speck init --force".cyan()
        );
        return Ok(());
    }

    println!("{} Fetching latest Speck release...", "=>".blue().bold());
    let release = ctx.provider.latest_release().await?;
    println!("   Latest version: {}", release.tag.green().bold());

    let extracted = ctx.provider.extract_release(&release.tag).await?;
    let planned = PlannedRelease::new(ctx, extracted.path(), args)?;

    println!();
    report::print_preview(&planned.preview(), &planned.diff_stats(&ctx.root));

    if args.dry_run {
        println!();
        println!("{} Dry run, no files were changed.", "=>".blue().bold());
        return Ok(());
    }

    let outcome = apply(ctx, planned, &VersionMarker::new(release.tag.as_str()))?;

    println!();
    println!(
        "{} Speck {} initialized ({} files written)",
        "OK".green().bold(),
        release.tag.green(),
        outcome.change_count()
    );
    println!("Next: open {} and start your first spec.", "AGENTS.md".cyan());

    fail_on_errors(&outcome)
}
