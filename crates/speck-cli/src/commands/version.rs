//! Version command implementation

use colored::Colorize;
use speck_release::ReleaseProvider;
use tracing::debug;

use crate::context::Context;
use crate::error::Result;

/// Print the CLI, project and latest release versions.
///
/// Network failures are reported inline rather than failing the command.
pub async fn run_version(ctx: &Context) -> Result<()> {
    let current = ctx.current_version()?;
    let latest = match ctx.provider.latest_release().await {
        Ok(release) => Some(release.tag),
        Err(e) => {
            debug!(error = %e, "latest release unavailable");
            None
        }
    };

    println!("speck CLI:       {}", env!("CARGO_PKG_VERSION"));
    match &current {
        Some(version) => println!("Project version: {}", version.as_str().cyan()),
        None => println!("Project version: {}", "(not initialized)".dimmed()),
    }
    match &latest {
        Some(tag) => println!("Latest release:  {}", tag.green()),
        None => println!("Latest release:  {}", "(could not fetch)".dimmed()),
    }

    if let (Some(current), Some(latest)) = (&current, &latest)
        && current.as_str() != latest
    {
        println!();
        println!("Run {} to upgrade.", "speck upgrade".cyan());
    }
    Ok(())
}
