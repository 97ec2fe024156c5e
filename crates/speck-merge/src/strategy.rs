//! MergeStrategy trait and the registry that resolves strategy ids.

use std::fmt;

use crate::MergeResult;
use crate::hooks::HookConfigMerge;
use crate::lines::LineSetMerge;
use crate::marker::StructuredMarkerMerge;
use crate::passthrough::PassThrough;
use crate::precedence::PrecedenceMerge;

/// Identifier of a smart-merge strategy, as referenced by the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeStrategyId {
    StructuredMarker,
    LineSet,
    HookConfig,
    Precedence,
    PassThrough,
}

impl MergeStrategyId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StructuredMarker => "structured-marker",
            Self::LineSet => "line-set",
            Self::HookConfig => "hook-config",
            Self::Precedence => "precedence",
            Self::PassThrough => "pass-through",
        }
    }
}

impl fmt::Display for MergeStrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pure reconciliation of release content with project content.
pub trait MergeStrategy: Send + Sync {
    /// The id this strategy is registered under.
    fn id(&self) -> MergeStrategyId;

    /// Combine `source` (release) with `target` (project, if present).
    fn merge(&self, source: &str, target: Option<&str>) -> MergeResult;
}

/// Registry that resolves a [`MergeStrategyId`] to its implementation.
pub struct MergeRegistry {
    marker: StructuredMarkerMerge,
    lines: LineSetMerge,
    hooks: HookConfigMerge,
    precedence: PrecedenceMerge,
    passthrough: PassThrough,
}

impl MergeRegistry {
    /// Create a registry with all built-in strategies.
    pub fn new() -> Self {
        Self {
            marker: StructuredMarkerMerge::new(),
            lines: LineSetMerge::new(),
            hooks: HookConfigMerge::new(),
            precedence: PrecedenceMerge::new(),
            passthrough: PassThrough,
        }
    }

    /// Get the strategy registered for `id`.
    pub fn get(&self, id: MergeStrategyId) -> &dyn MergeStrategy {
        match id {
            MergeStrategyId::StructuredMarker => &self.marker,
            MergeStrategyId::LineSet => &self.lines,
            MergeStrategyId::HookConfig => &self.hooks,
            MergeStrategyId::Precedence => &self.precedence,
            MergeStrategyId::PassThrough => &self.passthrough,
        }
    }
}

impl Default for MergeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
