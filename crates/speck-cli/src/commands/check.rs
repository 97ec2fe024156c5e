//! Check command implementation

use colored::Colorize;
use speck_release::ReleaseProvider;

use crate::context::Context;
use crate::error::Result;

/// Compare the project's version with the latest release.
pub async fn run_check(ctx: &Context) -> Result<()> {
    println!("{} Checking for updates...", "=>".blue().bold());

    let current = ctx.current_version()?;
    let latest = ctx.provider.latest_release().await?;

    let Some(current) = current else {
        println!("   Current version: {}", "(not initialized)".dimmed());
        println!("   Latest version:  {}", latest.tag.green().bold());
        println!();
        println!("Run {} to install Speck.", "speck init".cyan());
        return Ok(());
    };

    println!("   Current version: {}", current.as_str().cyan());
    println!("   Latest version:  {}", latest.tag.green().bold());
    println!();

    if current == *latest.tag.as_str() {
        println!("{} You are up to date.", "OK".green().bold());
        return Ok(());
    }

    println!("{} A new version is available.", "UPDATE".yellow().bold());
    if let Ok(Some(entries)) = ctx.provider.changelog(current.as_str(), &latest.tag).await
        && !entries.is_empty()
    {
        println!();
        for entry in &entries {
            println!(
                "   {}: {}",
                entry.version.green().bold(),
                entry.name.as_deref().unwrap_or(&entry.version)
            );
            if !entry.url.is_empty() {
                println!("     {}", entry.url.dimmed());
            }
        }
    }

    println!();
    println!("Run {} to upgrade.", "speck upgrade".cyan());
    println!("Run {} to preview changes.", "speck upgrade --dry-run".cyan());
    Ok(())
}
