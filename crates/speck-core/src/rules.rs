//! Path classification
//!
//! A [`RuleTable`] maps every relative path of a release tree to exactly one
//! [`Strategy`]. Rules are checked in tier order:
//!
//! 1. overwrite rules (longest matching subtree prefix wins),
//! 2. smart-merge exact paths,
//! 3. skip-if-customized exact paths,
//! 4. everything else falls back to [`Strategy::DefaultUpdate`].
//!
//! The table also carries an exclusion list of release-internal paths that
//! the fallback tier never copies into a project.

use std::fmt;

use speck_fs::NormalizedPath;
use speck_merge::{DetectorId, MergeStrategyId};
use tracing::debug;

use crate::{Error, Result};

/// How a single path is reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// The release always wins; subtrees are replaced wholesale
    Overwrite,
    /// Content-aware merge with the project's copy
    SmartMerge(MergeStrategyId),
    /// Written only while the project copy still looks like the template
    SkipIfCustomized(DetectorId),
    /// Create when absent, update when different
    DefaultUpdate,
}

impl Strategy {
    /// Processing tier, 1-based.
    pub fn tier(&self) -> u8 {
        match self {
            Self::Overwrite => 1,
            Self::SmartMerge(_) => 2,
            Self::SkipIfCustomized(_) => 3,
            Self::DefaultUpdate => 4,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::SmartMerge(id) => write!(f, "merge:{id}"),
            Self::SkipIfCustomized(id) => write!(f, "skip-if-customized:{id}"),
            Self::DefaultUpdate => write!(f, "default"),
        }
    }
}

/// Whether a pattern names one file or a whole directory subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Exact,
    Subtree,
}

/// A single classification rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub pattern: String,
    pub kind: PatternKind,
    pub strategy: Strategy,
}

impl Rule {
    pub fn matches(&self, path: &NormalizedPath) -> bool {
        match self.kind {
            PatternKind::Exact => path.as_str() == self.pattern,
            PatternKind::Subtree => path.is_within(&self.pattern),
        }
    }

    pub fn is_subtree(&self) -> bool {
        self.kind == PatternKind::Subtree
    }

    /// Whether some path could match both rules.
    fn overlaps(&self, other: &Rule) -> bool {
        let this = NormalizedPath::new(&self.pattern);
        let that = NormalizedPath::new(&other.pattern);
        match (self.kind, other.kind) {
            (PatternKind::Exact, PatternKind::Exact) => this == that,
            (PatternKind::Subtree, _) if that.is_within(&self.pattern) => true,
            (_, PatternKind::Subtree) => this.is_within(&other.pattern),
            _ => false,
        }
    }
}

/// Immutable rule table injected into the sync planner.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    exclusions: Vec<String>,
}

impl RuleTable {
    /// The table shipped with the Speck methodology.
    pub fn speck_default() -> Self {
        Self {
            rules: vec![
                Rule::overwrite_subtree(".speck"),
                Rule::overwrite_subtree(".cursor/commands"),
                Rule::overwrite_subtree(".cursor/hooks"),
                Rule::overwrite_subtree(".github/instructions"),
                Rule::overwrite_file(".github/copilot-instructions.md"),
                Rule::smart_merge("AGENTS.md", MergeStrategyId::StructuredMarker),
                Rule::smart_merge(".gitignore", MergeStrategyId::LineSet),
                Rule::smart_merge(".cursor/hooks.json", MergeStrategyId::HookConfig),
                Rule::smart_merge(".cursor/mcp.json", MergeStrategyId::Precedence),
                Rule::smart_merge(".cursor/mcp.example.json", MergeStrategyId::PassThrough),
                Rule::skip_if_customized("specs/README.md", DetectorId::FirstLine),
                Rule::skip_if_customized(
                    ".github/workflows/copilot-setup-steps.yml",
                    DetectorId::SetupSteps,
                ),
            ],
            exclusions: [
                ".git",
                "node_modules",
                "src",
                "packages",
                "tests",
                "specs",
                "README.md",
                "CHANGELOG.md",
                "LICENSE",
                "package.json",
                "package-lock.json",
                ".speckignore",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }

    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::default()
    }

    /// Check that no path can match two different tiers, and that no
    /// exclusion shadows an explicit rule pattern.
    pub fn validate(&self) -> Result<()> {
        for (i, first) in self.rules.iter().enumerate() {
            for second in &self.rules[i + 1..] {
                let nested_overwrite =
                    first.strategy == Strategy::Overwrite && second.strategy == Strategy::Overwrite;
                if first.overlaps(second) && !(nested_overwrite && first.pattern != second.pattern)
                {
                    return Err(Error::RuleConflict {
                        first: first.pattern.clone(),
                        second: second.pattern.clone(),
                    });
                }
            }
        }

        for exclusion in &self.exclusions {
            if let Some(rule) = self.rules.iter().find(|rule| rule.pattern == *exclusion) {
                return Err(Error::RuleConflict {
                    first: rule.pattern.clone(),
                    second: format!("exclusion {exclusion}"),
                });
            }
        }

        Ok(())
    }

    /// Classify a relative path. Pure and infallible.
    pub fn classify(&self, path: &NormalizedPath) -> Strategy {
        let strategy = self.rule_for(path).map_or(Strategy::DefaultUpdate, |rule| rule.strategy);
        debug!(path = %path, %strategy, "classified");
        strategy
    }

    /// The rule responsible for `path`, if any.
    pub fn rule_for(&self, path: &NormalizedPath) -> Option<&Rule> {
        let overwrite = self
            .overwrite_rules()
            .filter(|rule| rule.matches(path))
            .max_by_key(|rule| rule.pattern.len());
        if overwrite.is_some() {
            return overwrite;
        }

        self.tier(2)
            .chain(self.tier(3))
            .find(|rule| rule.matches(path))
    }

    /// Whether the fallback tier must leave `path` alone.
    pub fn is_excluded(&self, path: &NormalizedPath) -> bool {
        self.exclusions.iter().any(|exclusion| path.is_within(exclusion))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn exclusions(&self) -> &[String] {
        &self.exclusions
    }

    pub fn overwrite_rules(&self) -> impl Iterator<Item = &Rule> {
        self.tier(1)
    }

    pub fn smart_merge_rules(&self) -> impl Iterator<Item = (&Rule, MergeStrategyId)> {
        self.rules.iter().filter_map(|rule| match rule.strategy {
            Strategy::SmartMerge(id) => Some((rule, id)),
            _ => None,
        })
    }

    pub fn customization_rules(&self) -> impl Iterator<Item = (&Rule, DetectorId)> {
        self.rules.iter().filter_map(|rule| match rule.strategy {
            Strategy::SkipIfCustomized(id) => Some((rule, id)),
            _ => None,
        })
    }

    fn tier(&self, tier: u8) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |rule| rule.strategy.tier() == tier)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::speck_default()
    }
}

impl Rule {
    fn overwrite_subtree(prefix: &str) -> Self {
        Self {
            pattern: NormalizedPath::new(prefix).as_str().to_string(),
            kind: PatternKind::Subtree,
            strategy: Strategy::Overwrite,
        }
    }

    fn overwrite_file(path: &str) -> Self {
        Self {
            pattern: NormalizedPath::new(path).as_str().to_string(),
            kind: PatternKind::Exact,
            strategy: Strategy::Overwrite,
        }
    }

    fn smart_merge(path: &str, id: MergeStrategyId) -> Self {
        Self {
            pattern: NormalizedPath::new(path).as_str().to_string(),
            kind: PatternKind::Exact,
            strategy: Strategy::SmartMerge(id),
        }
    }

    fn skip_if_customized(path: &str, id: DetectorId) -> Self {
        Self {
            pattern: NormalizedPath::new(path).as_str().to_string(),
            kind: PatternKind::Exact,
            strategy: Strategy::SkipIfCustomized(id),
        }
    }
}

/// Builder for custom rule tables.
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    rules: Vec<Rule>,
    exclusions: Vec<String>,
}

impl RuleTableBuilder {
    pub fn overwrite_subtree(mut self, prefix: &str) -> Self {
        self.rules.push(Rule::overwrite_subtree(prefix));
        self
    }

    pub fn overwrite_file(mut self, path: &str) -> Self {
        self.rules.push(Rule::overwrite_file(path));
        self
    }

    pub fn smart_merge(mut self, path: &str, id: MergeStrategyId) -> Self {
        self.rules.push(Rule::smart_merge(path, id));
        self
    }

    pub fn skip_if_customized(mut self, path: &str, id: DetectorId) -> Self {
        self.rules.push(Rule::skip_if_customized(path, id));
        self
    }

    pub fn exclude(mut self, path: &str) -> Self {
        self.exclusions.push(NormalizedPath::new(path).as_str().to_string());
        self
    }

    /// Finish the table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RuleConflict`] when two tiers overlap.
    pub fn build(self) -> Result<RuleTable> {
        let table = RuleTable {
            rules: self.rules,
            exclusions: self.exclusions,
        };
        table.validate()?;
        Ok(table)
    }
}
