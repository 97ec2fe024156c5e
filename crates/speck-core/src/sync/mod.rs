//! Smart sync: plan and apply a release tree against a project
//!
//! Planning reads the project but never writes to it, so a plan doubles as
//! a dry-run preview. Execution applies the plan one path at a time; a
//! failure on one path is recorded in the outcome and the batch carries on.

mod outcome;
mod plan;

pub use outcome::{FileError, FileWarning, SyncOutcome};
pub use plan::{Operation, PlannedStep, SyncPlan};

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use speck_fs::{FileSystem, LocalFs, NormalizedPath, SpeckPath};
use speck_merge::{DetectorId, DetectorRegistry, MergeAction, MergeRegistry, MergeStrategyId};
use tracing::{debug, info, warn};

use crate::{FileEntry, ReleaseTree, Result, Rule, RuleTable, Strategy};
use plan::{record_warning, record_write};

/// Options for sync operations
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// If true, plan only and report what would change.
    pub dry_run: bool,
}

/// Planner and executor for rule-driven syncs.
pub struct SmartSync<F: FileSystem = LocalFs> {
    fs: F,
    target: PathBuf,
    rules: RuleTable,
    merges: MergeRegistry,
    detectors: DetectorRegistry,
}

impl SmartSync<LocalFs> {
    /// Sync into `target` on the local disk with the default rule table.
    pub fn local(target: impl Into<PathBuf>) -> Self {
        Self::new(LocalFs::new(), target)
    }
}

impl<F: FileSystem> SmartSync<F> {
    pub fn new(fs: F, target: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            target: target.into(),
            rules: RuleTable::speck_default(),
            merges: MergeRegistry::new(),
            detectors: DetectorRegistry::new(),
        }
    }

    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Plan, then execute unless `options.dry_run` is set.
    pub fn sync(&self, release: &ReleaseTree, options: &SyncOptions) -> SyncOutcome {
        let plan = self.plan(release);
        if options.dry_run {
            plan.preview()
        } else {
            self.execute(plan)
        }
    }

    /// Plan and execute in one go.
    pub fn run(&self, release: &ReleaseTree) -> SyncOutcome {
        self.execute(self.plan(release))
    }

    /// Decide what to do for every release path, in tier order.
    ///
    /// Reads the project but never modifies it. Per-path failures become
    /// [`Operation::Failed`] steps.
    pub fn plan(&self, release: &ReleaseTree) -> SyncPlan {
        let mut plan = SyncPlan::new();

        for rule in self.rules.overwrite_rules() {
            let step = if rule.is_subtree() {
                self.plan_subtree(rule, release)
            } else {
                self.plan_overwrite_file(rule, release)
            };
            plan.extend(step);
        }

        for (rule, id) in self.rules.smart_merge_rules() {
            plan.extend(self.plan_merge(rule, id, release));
        }

        for (rule, id) in self.rules.customization_rules() {
            plan.extend(self.plan_customizable(rule, id, release));
        }

        for entry in release.files() {
            if self.rules.classify(&entry.path) != Strategy::DefaultUpdate
                || self.rules.is_excluded(&entry.path)
            {
                continue;
            }
            let operation = match self.read_target(&entry.path) {
                Ok(None) => Operation::Write {
                    content: entry.content.clone(),
                    action: MergeAction::Create,
                },
                Ok(Some(existing)) if existing != entry.content => Operation::Write {
                    content: entry.content.clone(),
                    action: MergeAction::Update,
                },
                Ok(Some(_)) => Operation::Unchanged,
                Err(e) => Operation::Failed {
                    message: e.to_string(),
                },
            };
            plan.push(self.step(entry.path.clone(), Strategy::DefaultUpdate, operation));
        }

        info!(steps = plan.len(), "planned sync");
        plan
    }

    /// Apply a plan to the project.
    pub fn execute(&self, plan: SyncPlan) -> SyncOutcome {
        let mut outcome = SyncOutcome::new();

        for step in plan {
            record_warning(&step, &mut outcome);
            let label = step.label();
            match step.operation {
                Operation::ReplaceTree {
                    files,
                    removed,
                    existed,
                    clear,
                } => self.replace_tree(&step.path, files, removed, existed, clear, &mut outcome),
                Operation::Write { content, action } => {
                    match self.fs.write(&self.absolute(&step.path), &content) {
                        Ok(()) => record_write(&label, action, &mut outcome),
                        Err(e) => capture(&mut outcome, &label, e),
                    }
                }
                Operation::Skip { reason } => {
                    debug!(path = %label, %reason, "skipped");
                    outcome.skipped.push(label);
                }
                Operation::Unchanged => outcome.unchanged.push(label),
                Operation::Failed { message } => {
                    warn!(path = %label, error = %message, "file failed during planning");
                    outcome.error(label, message);
                }
            }
        }

        info!(
            created = outcome.created.len(),
            updated = outcome.updated.len(),
            merged = outcome.merged.len(),
            removed = outcome.removed.len(),
            skipped = outcome.skipped.len(),
            errors = outcome.errors.len(),
            "sync complete"
        );
        outcome
    }

    fn plan_subtree(&self, rule: &Rule, release: &ReleaseTree) -> Option<PlannedStep> {
        let owned = |path: &NormalizedPath| {
            path.as_str() != SpeckPath::VersionFile.as_str()
                && self
                    .rules
                    .rule_for(path)
                    .is_some_and(|owner| owner.pattern == rule.pattern)
        };

        let files: Vec<(NormalizedPath, Vec<u8>)> = release
            .within(&rule.pattern)
            .filter(|entry| owned(&entry.path))
            .map(|entry| (entry.path.clone(), entry.content.clone()))
            .collect();
        if files.is_empty() {
            return None;
        }

        let prefix = NormalizedPath::new(&rule.pattern);
        let nested = self
            .rules
            .overwrite_rules()
            .any(|other| {
                other.pattern != rule.pattern
                    && NormalizedPath::new(&other.pattern).is_within(&rule.pattern)
            });
        let root = self.absolute(&prefix);
        let existed = self.fs.is_dir(&root);

        let removed = if existed {
            let incoming: BTreeSet<&NormalizedPath> = files.iter().map(|(path, _)| path).collect();
            match self.fs.walk_files(&root) {
                Ok(current) => current
                    .into_iter()
                    .map(|relative| prefix.join(relative.as_str()))
                    .filter(|path| owned(path) && !incoming.contains(path))
                    .collect(),
                Err(e) => {
                    return Some(self.step(
                        prefix,
                        Strategy::Overwrite,
                        Operation::Failed {
                            message: e.to_string(),
                        },
                    ));
                }
            }
        } else {
            Vec::new()
        };

        Some(self.step(
            prefix,
            Strategy::Overwrite,
            Operation::ReplaceTree {
                files,
                removed,
                existed,
                clear: !nested,
            },
        ))
    }

    fn plan_overwrite_file(&self, rule: &Rule, release: &ReleaseTree) -> Option<PlannedStep> {
        let entry = release.get(&rule.pattern)?;
        let action = if self.fs.exists(&self.absolute(&entry.path)) {
            MergeAction::Update
        } else {
            MergeAction::Create
        };
        Some(self.step(
            entry.path.clone(),
            Strategy::Overwrite,
            Operation::Write {
                content: entry.content.clone(),
                action,
            },
        ))
    }

    fn plan_merge(
        &self,
        rule: &Rule,
        id: MergeStrategyId,
        release: &ReleaseTree,
    ) -> Option<PlannedStep> {
        let entry = release.get(&rule.pattern)?;
        let strategy = Strategy::SmartMerge(id);

        let (source, target) = match self.texts(entry) {
            Ok(texts) => texts,
            Err(e) => return Some(self.failed(entry.path.clone(), strategy, e)),
        };

        let result = self.merges.get(id).merge(source, target.as_deref());
        if let Some(warning) = &result.warning {
            warn!(path = %entry.path, %warning, "recovered from unparseable content");
        }

        let operation = match (result.action, result.content) {
            (MergeAction::Skip, _) => Operation::Skip {
                reason: format!("{id} merge left the file as is"),
            },
            // Pass-through always answers `Update`; a file that did not
            // exist is still reported as created.
            (action, Some(content)) => Operation::Write {
                content: content.into_bytes(),
                action: if target.is_none() {
                    MergeAction::Create
                } else {
                    action
                },
            },
            (action, None) => Operation::Failed {
                message: format!("{id} merge returned {action} without content"),
            },
        };
        Some(self.step(entry.path.clone(), strategy, operation).with_warning(result.warning))
    }

    fn plan_customizable(
        &self,
        rule: &Rule,
        id: DetectorId,
        release: &ReleaseTree,
    ) -> Option<PlannedStep> {
        let entry = release.get(&rule.pattern)?;
        let strategy = Strategy::SkipIfCustomized(id);

        let operation = match self.texts(entry) {
            Ok((_, None)) => Operation::Write {
                content: entry.content.clone(),
                action: MergeAction::Create,
            },
            Ok((source, Some(target))) => match self.detectors.get(id).explain(source, &target) {
                Some(reason) => Operation::Skip { reason },
                None => Operation::Write {
                    content: entry.content.clone(),
                    action: MergeAction::Update,
                },
            },
            Err(e) => return Some(self.failed(entry.path.clone(), strategy, e)),
        };
        Some(self.step(entry.path.clone(), strategy, operation))
    }

    fn replace_tree(
        &self,
        prefix: &NormalizedPath,
        files: Vec<(NormalizedPath, Vec<u8>)>,
        removed: Vec<NormalizedPath>,
        existed: bool,
        clear: bool,
        outcome: &mut SyncOutcome,
    ) {
        let label = format!("{prefix}/");

        if existed {
            // The version marker lives inside `.speck` but is not release content.
            let marker_path = NormalizedPath::new(SpeckPath::VersionFile.as_str());
            let marker = self.absolute(&marker_path);
            let kept = if clear && marker_path.is_within(prefix.as_str()) {
                self.fs.read_optional(&marker)
            } else {
                Ok(None)
            };

            match kept {
                Ok(kept) if clear => {
                    if let Err(e) = self.fs.remove_all(&self.absolute(prefix)) {
                        capture(outcome, &label, e);
                        return;
                    }
                    if let Some(bytes) = kept
                        && let Err(e) = self.fs.write(&marker, &bytes)
                    {
                        capture(outcome, marker_path.as_str(), e);
                    }
                }
                kept => {
                    // An unreadable marker cannot be restored, so only the
                    // planned stale files are removed and the marker stays.
                    if let Err(e) = kept {
                        capture(outcome, marker_path.as_str(), e);
                    }
                    for path in &removed {
                        if let Err(e) = self.fs.remove_all(&self.absolute(path)) {
                            capture(outcome, path.as_str(), e);
                        }
                    }
                }
            }
        }

        let mut written = Vec::new();
        for (path, content) in files {
            match self.fs.write(&self.absolute(&path), &content) {
                Ok(()) => written.push(path.to_string()),
                Err(e) => capture(outcome, path.as_str(), e),
            }
        }

        if existed {
            outcome.updated.push(label);
            outcome
                .removed
                .extend(removed.iter().map(ToString::to_string));
        } else {
            outcome.created.extend(written);
        }
    }

    fn read_target(&self, path: &NormalizedPath) -> speck_fs::Result<Option<Vec<u8>>> {
        self.fs.read_optional(&self.absolute(path))
    }

    /// Release text and project text, both required to be UTF-8.
    fn texts<'e>(&self, entry: &'e FileEntry) -> Result<(&'e str, Option<String>)> {
        let source = entry.text()?;
        let target = self.read_target_text(&entry.path)?;
        Ok((source, target))
    }

    fn read_target_text(&self, path: &NormalizedPath) -> Result<Option<String>> {
        match self.read_target(path)? {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes).map(Some).map_err(|_| {
                speck_fs::Error::InvalidUtf8 {
                    path: self.absolute(path),
                }
                .into()
            }),
        }
    }

    fn absolute(&self, path: &NormalizedPath) -> PathBuf {
        self.target.join(path.to_native())
    }

    fn step(&self, path: NormalizedPath, strategy: Strategy, operation: Operation) -> PlannedStep {
        debug!(path = %path, %strategy, operation = operation_name(&operation), "planned");
        PlannedStep::new(path, strategy, operation)
    }

    fn failed(
        &self,
        path: NormalizedPath,
        strategy: Strategy,
        error: impl std::fmt::Display,
    ) -> PlannedStep {
        warn!(path = %path, error = %error, "planning failed");
        self.step(
            path,
            strategy,
            Operation::Failed {
                message: error.to_string(),
            },
        )
    }
}

fn capture(outcome: &mut SyncOutcome, path: &str, error: impl std::fmt::Display) {
    warn!(path = %path, error = %error, "file operation failed");
    outcome.error(path, error.to_string());
}

fn operation_name(operation: &Operation) -> &'static str {
    match operation {
        Operation::ReplaceTree { .. } => "replace-tree",
        Operation::Write { .. } => "write",
        Operation::Skip { .. } => "skip",
        Operation::Unchanged => "unchanged",
        Operation::Failed { .. } => "failed",
    }
}
