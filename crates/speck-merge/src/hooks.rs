//! Deep merge for hook configuration documents.
//!
//! ```json
//! {
//!   "version": 1,
//!   "hooks": {
//!     "afterFileEdit": [{ "command": ".cursor/hooks/format.sh" }]
//!   }
//! }
//! ```
//!
//! `version` follows the release. Each `hooks` list is the union of the
//! release list and the project list, deduplicated by structural equality.

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};

use crate::{MergeResult, MergeStrategy, MergeStrategyId};

const VERSION_KEY: &str = "version";
const HOOKS_KEY: &str = "hooks";

/// Merges hook lists from the release into the project's hook config.
#[derive(Debug, Default, Clone, Copy)]
pub struct HookConfigMerge;

impl HookConfigMerge {
    pub fn new() -> Self {
        Self
    }

    /// Merge two parsed hook documents.
    pub fn merge_values(source: &Map<String, Value>, target: &Map<String, Value>) -> Map<String, Value> {
        let mut merged = target.clone();

        for (key, value) in source {
            if !merged.contains_key(key) {
                merged.insert(key.clone(), value.clone());
            }
        }

        if let Some(version) = source.get(VERSION_KEY).or_else(|| target.get(VERSION_KEY)) {
            merged.insert(VERSION_KEY.to_string(), version.clone());
        }

        let source_hooks = source.get(HOOKS_KEY).and_then(Value::as_object);
        let target_hooks = target.get(HOOKS_KEY).and_then(Value::as_object);
        if let (Some(source_hooks), Some(target_hooks)) = (source_hooks, target_hooks) {
            merged.insert(
                HOOKS_KEY.to_string(),
                Value::Object(merge_hook_map(source_hooks, target_hooks)),
            );
        }

        merged
    }
}

impl MergeStrategy for HookConfigMerge {
    fn id(&self) -> MergeStrategyId {
        MergeStrategyId::HookConfig
    }

    fn merge(&self, source: &str, target: Option<&str>) -> MergeResult {
        let Some(target) = target else {
            return MergeResult::create(source);
        };

        let (source_obj, target_obj) = match (parse_object(source), parse_object(target)) {
            (Ok(s), Ok(t)) => (s, t),
            (Err(e), _) | (_, Err(e)) => {
                return MergeResult::update(source).with_warning(format!(
                    "existing hook config could not be parsed ({e}); replaced with release version"
                ));
            }
        };

        let merged = Self::merge_values(&source_obj, &target_obj);
        match serde_json::to_string_pretty(&Value::Object(merged)) {
            Ok(mut content) => {
                content.push('\n');
                MergeResult::merge(content)
            }
            Err(e) => MergeResult::update(source)
                .with_warning(format!("merged hook config could not be serialized ({e})")),
        }
    }
}

/// Merge two `hooks` maps key by key.
///
/// Release keys come first, then keys only the project defines. Shared keys
/// holding arrays get a deduplicated union; for any other shared value the
/// release wins.
fn merge_hook_map(source: &Map<String, Value>, target: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = Map::new();

    for (event, source_value) in source {
        let value = match (source_value, target.get(event)) {
            (Value::Array(source_list), Some(Value::Array(target_list))) => {
                Value::Array(union_by_structure(source_list, target_list))
            }
            _ => source_value.clone(),
        };
        merged.insert(event.clone(), value);
    }

    for (event, target_value) in target {
        if !merged.contains_key(event) {
            merged.insert(event.clone(), target_value.clone());
        }
    }

    merged
}

/// Concatenate two lists, dropping entries whose canonical serialization
/// was already seen. First occurrence wins, source entries first.
pub fn union_by_structure(source: &[Value], target: &[Value]) -> Vec<Value> {
    let mut seen = HashSet::new();
    source
        .iter()
        .chain(target)
        .filter(|entry| seen.insert(canonical(entry)))
        .cloned()
        .collect()
}

/// Compact serialization with object keys sorted at every depth.
///
/// Keys are sorted explicitly so the result does not depend on whether
/// `serde_json` keeps insertion order.
fn canonical(value: &Value) -> String {
    sorted(value).to_string()
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let entries: BTreeMap<&String, Value> =
                map.iter().map(|(key, inner)| (key, sorted(inner))).collect();
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, inner)| (key.clone(), inner))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

fn parse_object(content: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("top-level value is not an object".to_string()),
        Err(e) => Err(e.to_string()),
    }
}
