//! Unconditional copy for example and template files.

use crate::{MergeResult, MergeStrategy, MergeStrategyId};

/// Always replaces the target with the release content.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThrough;

impl MergeStrategy for PassThrough {
    fn id(&self) -> MergeStrategyId {
        MergeStrategyId::PassThrough
    }

    fn merge(&self, source: &str, _target: Option<&str>) -> MergeResult {
        MergeResult::update(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_regardless_of_target() {
        assert_eq!(PassThrough.merge("x", None), MergeResult::update("x"));
        assert_eq!(PassThrough.merge("x", Some("y")), MergeResult::update("x"));
    }
}
