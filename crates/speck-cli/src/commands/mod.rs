//! Command implementations for speck-cli

pub mod check;
pub mod init;
pub mod report;
pub mod upgrade;
pub mod version;

pub use check::run_check;
pub use init::run_init;
pub use upgrade::run_upgrade;
pub use version::run_version;

use std::path::Path;

use speck_core::{
    IgnoreList, LegacyPlan, LegacySync, ReleaseTree, SmartSync, SyncOutcome, SyncPlan,
    VersionMarker,
};
use speck_fs::LocalFs;

use crate::cli::SyncArgs;
use crate::context::Context;
use crate::error::{CliError, Result};
use report::DiffStats;

/// A planned sync in either mode, ready to preview or apply.
pub enum PlannedRelease {
    Smart { sync: SmartSync, plan: SyncPlan },
    Legacy { sync: LegacySync, plan: LegacyPlan },
}

impl PlannedRelease {
    /// Load the extracted release at `release_root` and plan it against the
    /// project.
    pub fn new(ctx: &Context, release_root: &Path, args: &SyncArgs) -> Result<Self> {
        let fs = LocalFs::new();
        let tree = ReleaseTree::load(&fs, release_root)?;

        if args.legacy {
            let extra = ctx
                .settings
                .ignore
                .iter()
                .chain(&args.ignore)
                .map(String::as_str);
            let ignore = IgnoreList::for_project(&fs, &ctx.root, extra)?;
            let sync = LegacySync::new(fs, &ctx.root, ignore);
            let plan = sync.plan(&tree);
            Ok(Self::Legacy { sync, plan })
        } else {
            let sync = SmartSync::new(fs, &ctx.root);
            let plan = sync.plan(&tree);
            Ok(Self::Smart { sync, plan })
        }
    }

    pub fn preview(&self) -> SyncOutcome {
        match self {
            Self::Smart { plan, .. } => plan.preview(),
            Self::Legacy { plan, .. } => plan.preview(),
        }
    }

    pub fn diff_stats(&self, root: &Path) -> DiffStats {
        match self {
            Self::Smart { plan, .. } => report::smart_diff_stats(plan, root),
            Self::Legacy { plan, .. } => report::legacy_diff_stats(plan, root),
        }
    }

    pub fn execute(self) -> SyncOutcome {
        match self {
            Self::Smart { sync, plan } => sync.execute(plan),
            Self::Legacy { sync, plan } => sync.execute(plan),
        }
    }
}

/// Apply a planned release, record the version and report failures.
///
/// The version is written even when some files failed: the sync itself
/// completed, and the failures are surfaced through the exit code.
pub fn apply(ctx: &Context, planned: PlannedRelease, version: &VersionMarker) -> Result<SyncOutcome> {
    let outcome = planned.execute();
    ctx.versions().write_version(version)?;

    report::print_warnings(&outcome);
    if outcome.has_errors() {
        report::print_errors(&outcome);
    }
    Ok(outcome)
}

/// Turn remaining file errors into a failing exit status.
pub fn fail_on_errors(outcome: &SyncOutcome) -> Result<()> {
    if outcome.has_errors() {
        return Err(CliError::user(format!(
            "{} file(s) failed to sync",
            outcome.errors.len()
        )));
    }
    Ok(())
}
