//! Precedence merge for server configuration documents.
//!
//! The project's file is never created by a sync: server entries often need
//! secrets the release cannot know. When the file exists, release servers
//! are offered as defaults and every server the user defined wins.

use serde_json::{Map, Value};

use crate::{MergeResult, MergeStrategy, MergeStrategyId};

/// Top-level key holding the server map.
pub const SERVERS_KEY: &str = "mcpServers";

/// Shallow merge of one keyed mapping where project entries take precedence.
#[derive(Debug, Clone)]
pub struct PrecedenceMerge {
    key: String,
}

impl PrecedenceMerge {
    /// Merge the `mcpServers` mapping.
    pub fn new() -> Self {
        Self::for_key(SERVERS_KEY)
    }

    pub fn for_key(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Merge two parsed documents; the project wins every tie.
    pub fn merge_values(&self, source: &Map<String, Value>, target: &Map<String, Value>) -> Map<String, Value> {
        let mut merged = source.clone();
        for (key, value) in target {
            if key != &self.key {
                merged.insert(key.clone(), value.clone());
            }
        }

        let mut entries = source
            .get(&self.key)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        if let Some(user_entries) = target.get(&self.key).and_then(Value::as_object) {
            for (name, entry) in user_entries {
                entries.insert(name.clone(), entry.clone());
            }
        }
        merged.insert(self.key.clone(), Value::Object(entries));

        merged
    }
}

impl Default for PrecedenceMerge {
    fn default() -> Self {
        Self::new()
    }
}

impl MergeStrategy for PrecedenceMerge {
    fn id(&self) -> MergeStrategyId {
        MergeStrategyId::Precedence
    }

    fn merge(&self, source: &str, target: Option<&str>) -> MergeResult {
        let Some(target) = target else {
            return MergeResult::skip();
        };

        let parsed = serde_json::from_str::<Value>(source)
            .and_then(|s| serde_json::from_str::<Value>(target).map(|t| (s, t)));
        let (source_obj, target_obj) = match parsed {
            Ok((Value::Object(s), Value::Object(t))) => (s, t),
            Ok(_) => {
                return MergeResult::skip()
                    .with_warning("server config is not a JSON object; left untouched");
            }
            Err(e) => {
                return MergeResult::skip()
                    .with_warning(format!("server config could not be parsed ({e}); left untouched"));
            }
        };

        let merged = self.merge_values(&source_obj, &target_obj);
        match serde_json::to_string_pretty(&Value::Object(merged)) {
            Ok(mut content) => {
                content.push('\n');
                MergeResult::merge(content)
            }
            Err(e) => MergeResult::skip()
                .with_warning(format!("merged server config could not be serialized ({e})")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MergeAction;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn absent_target_is_never_created() {
        let result = PrecedenceMerge::new().merge(r#"{"mcpServers": {}}"#, None);
        assert_eq!(result, MergeResult::skip());
    }

    #[test]
    fn user_entries_win_and_release_entries_are_added() {
        let source = json!({"mcpServers": {
            "github": {"command": "npx", "args": ["@github/mcp"]},
            "docs": {"url": "https://docs.example"}
        }});
        let target = json!({"mcpServers": {
            "github": {"command": "docker", "env": {"GITHUB_TOKEN": "secret"}}
        }});

        let result = PrecedenceMerge::new().merge(&source.to_string(), Some(&target.to_string()));
        assert_eq!(result.action, MergeAction::Merge);

        let merged: Value = serde_json::from_str(&result.content.unwrap()).unwrap();
        assert_eq!(merged["mcpServers"]["github"], target["mcpServers"]["github"]);
        assert_eq!(merged["mcpServers"]["docs"], source["mcpServers"]["docs"]);
    }

    #[test]
    fn malformed_input_is_skipped_with_warning() {
        let result = PrecedenceMerge::new().merge("{}", Some("{ broken"));
        assert_eq!(result.action, MergeAction::Skip);
        assert!(result.content.is_none());
        assert!(result.warning.is_some());
    }
}
