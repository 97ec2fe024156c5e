//! Speck CLI
//!
//! Installs the Speck methodology into a project and keeps it current with
//! new template releases.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() {
    let cli = Cli::parse();
    let debug = cli.debug || std::env::var_os("DEBUG").is_some();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        if debug {
            eprintln!("{e:?}");
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    }

    let cwd = std::env::current_dir()?;
    let ctx = Context::resolve(&cwd, &cli)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(execute_command(&ctx, cli.command))
}

async fn execute_command(ctx: &Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init { force, sync } => commands::run_init(ctx, force, &sync).await,
        Commands::Upgrade { version, sync } => {
            commands::run_upgrade(ctx, &version, &sync).await
        }
        Commands::Check => commands::run_check(ctx).await,
        Commands::Version => commands::run_version(ctx).await,
    }
}
