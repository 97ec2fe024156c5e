//! CLI argument parsing using clap derive

use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand};

/// Speck - install and upgrade the Speck methodology in your project
#[derive(Parser, Debug)]
#[command(name = "speck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print full error details
    #[arg(long, global = true, env = "SPECK_DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: bool,

    /// Template repository as owner/name
    #[arg(long, global = true, env = "SPECK_REPOSITORY", hide = true)]
    pub repository: Option<String>,

    /// Base URL of the release API
    #[arg(long, global = true, env = "SPECK_API_BASE", hide = true)]
    pub api_base: Option<String>,

    /// Token for private template repositories
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide = true, hide_env_values = true)]
    pub token: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by commands that write files
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncArgs {
    /// Show what would change without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Copy every non-ignored file instead of merging
    #[arg(long)]
    pub legacy: bool,

    /// Additional patterns to ignore in legacy mode (can be repeated)
    #[arg(long = "ignore", value_name = "GLOB", requires = "legacy")]
    pub ignore: Vec<String>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Initialize Speck in the current directory
    Init {
        /// Reinitialize even if Speck files already exist
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        sync: SyncArgs,
    },

    /// Upgrade to the latest (or the given) version
    ///
    /// Examples:
    ///   speck upgrade
    ///   speck upgrade v2.1.0
    ///   speck upgrade --dry-run
    Upgrade {
        /// Release tag to upgrade to
        #[arg(default_value = "latest")]
        version: String,

        #[command(flatten)]
        sync: SyncArgs,
    },

    /// Check for available updates
    Check,

    /// Show current and latest versions
    Version,
}
