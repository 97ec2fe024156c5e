//! The inspectable result of planning a sync.

use speck_fs::NormalizedPath;
use speck_merge::MergeAction;

use super::SyncOutcome;
use crate::Strategy;

/// What the executor will do for one planned path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Delete and recreate an overwrite subtree.
    ReplaceTree {
        /// Files to write, relative to the project root
        files: Vec<(NormalizedPath, Vec<u8>)>,
        /// Project files that disappear with this release
        removed: Vec<NormalizedPath>,
        /// Whether the subtree existed in the project before
        existed: bool,
        /// Remove the whole subtree first; false when a nested rule owns
        /// part of it, in which case only `removed` is deleted
        clear: bool,
    },
    /// Write one file.
    Write { content: Vec<u8>, action: MergeAction },
    /// Leave the project copy alone.
    Skip { reason: String },
    /// Project copy already matches the release.
    Unchanged,
    /// Planning this path failed.
    Failed { message: String },
}

/// One path of a [`SyncPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub path: NormalizedPath,
    pub strategy: Strategy,
    pub operation: Operation,
    pub warning: Option<String>,
}

impl PlannedStep {
    pub fn new(path: NormalizedPath, strategy: Strategy, operation: Operation) -> Self {
        Self {
            path,
            strategy,
            operation,
            warning: None,
        }
    }

    pub fn with_warning(mut self, warning: Option<String>) -> Self {
        self.warning = warning;
        self
    }

    /// Label used in outcome lists; subtrees end with `/`.
    pub fn label(&self) -> String {
        match self.operation {
            Operation::ReplaceTree { .. } => format!("{}/", self.path),
            _ => self.path.to_string(),
        }
    }
}

/// Ordered steps, in tier order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    steps: Vec<PlannedStep>,
}

impl SyncPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: PlannedStep) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[PlannedStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The outcome executing this plan would produce, assuming no I/O fails.
    pub fn preview(&self) -> SyncOutcome {
        let mut outcome = SyncOutcome::new();
        for step in &self.steps {
            record_warning(step, &mut outcome);
            match &step.operation {
                Operation::ReplaceTree {
                    files,
                    removed,
                    existed,
                    ..
                } => {
                    if *existed {
                        outcome.updated.push(step.label());
                        outcome
                            .removed
                            .extend(removed.iter().map(ToString::to_string));
                    } else {
                        outcome
                            .created
                            .extend(files.iter().map(|(path, _)| path.to_string()));
                    }
                }
                Operation::Write { action, .. } => {
                    record_write(&step.label(), *action, &mut outcome);
                }
                Operation::Skip { .. } => outcome.skipped.push(step.label()),
                Operation::Unchanged => outcome.unchanged.push(step.label()),
                Operation::Failed { message } => outcome.error(step.label(), message.clone()),
            }
        }
        outcome
    }
}

impl Extend<PlannedStep> for SyncPlan {
    fn extend<I: IntoIterator<Item = PlannedStep>>(&mut self, iter: I) {
        for step in iter {
            self.push(step);
        }
    }
}

impl IntoIterator for SyncPlan {
    type Item = PlannedStep;
    type IntoIter = std::vec::IntoIter<PlannedStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

pub(crate) fn record_warning(step: &PlannedStep, outcome: &mut SyncOutcome) {
    if let Some(warning) = &step.warning {
        outcome.warning(step.label(), warning.clone());
    }
}

pub(crate) fn record_write(label: &str, action: MergeAction, outcome: &mut SyncOutcome) {
    let list = match action {
        MergeAction::Create => &mut outcome.created,
        MergeAction::Update => &mut outcome.updated,
        MergeAction::Merge => &mut outcome.merged,
        MergeAction::Skip => &mut outcome.skipped,
    };
    list.push(label.to_string());
}
