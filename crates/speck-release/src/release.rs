//! Release metadata as published by the release API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One published release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    #[serde(rename = "tag_name")]
    pub tag: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(rename = "html_url", default)]
    pub url: String,
}

impl Release {
    /// The display name, falling back to the tag.
    pub fn title(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.tag)
    }
}

/// A release between two versions, for upgrade notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    pub version: String,
    pub name: Option<String>,
    pub body: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub url: String,
}

impl ChangelogEntry {
    /// The first `limit` non-empty lines of the release notes.
    pub fn summary(&self, limit: usize) -> Vec<&str> {
        self.body
            .as_deref()
            .unwrap_or("")
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .take(limit)
            .collect()
    }
}

impl From<&Release> for ChangelogEntry {
    fn from(release: &Release) -> Self {
        Self {
            version: release.tag.clone(),
            name: release.name.clone(),
            body: release.body.clone(),
            published_at: release.published_at,
            url: release.url.clone(),
        }
    }
}

/// Releases newer than `from` up to and including `to`.
///
/// `releases` must be ordered newest first. Returns `None` when either tag
/// is unknown.
pub fn changelog_between(releases: &[Release], from: &str, to: &str) -> Option<Vec<ChangelogEntry>> {
    let from_index = releases.iter().position(|r| r.tag == from)?;
    let to_index = releases.iter().position(|r| r.tag == to)?;
    if to_index >= from_index {
        return Some(Vec::new());
    }
    Some(
        releases[to_index..from_index]
            .iter()
            .map(ChangelogEntry::from)
            .collect(),
    )
}
