//! GitHub-backed release provider
//!
//! Talks to the releases API and downloads tag archives with `curl`, then
//! unpacks them with `tar`. Both run as subprocesses so no HTTP or archive
//! code lives in this crate.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};
use crate::provider::{ExtractedRelease, ReleaseProvider};
use crate::Release;

const USER_AGENT: &str = "speck-cli";
const ACCEPT: &str = "application/vnd.github.v3+json";
const STATUS_MARKER: &str = "\n__speck_status__:";

/// Where and how to reach the release host.
///
/// There is no default; callers build it from resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubConfig {
    /// `owner/name`
    pub repository: String,
    pub api_base: String,
    pub archive_base: String,
    pub timeout_secs: u64,
    pub token: Option<String>,
}

/// [`ReleaseProvider`] for a GitHub repository.
#[derive(Debug, Clone)]
pub struct GitHubReleases {
    config: GitHubConfig,
}

impl GitHubReleases {
    pub fn new(config: GitHubConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    pub fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/releases",
            self.config.api_base.trim_end_matches('/'),
            self.config.repository
        )
    }

    pub fn archive_url(&self, tag: &str) -> String {
        format!(
            "{}/{}/archive/refs/tags/{}.tar.gz",
            self.config.archive_base.trim_end_matches('/'),
            self.config.repository,
            tag
        )
    }

    /// `curl` with the common flags; the HTTP status is appended to stdout.
    fn curl(&self, url: &str, accept_json: bool) -> Command {
        let mut cmd = Command::new("curl");
        cmd.args(["-sS", "-L", "--max-time"])
            .arg(self.config.timeout_secs.to_string())
            .arg("-H")
            .arg(format!("User-Agent: {USER_AGENT}"))
            .arg("-w")
            .arg(format!("{STATUS_MARKER}%{{http_code}}"));
        if accept_json {
            cmd.arg("-H").arg(format!("Accept: {ACCEPT}"));
        }
        if let Some(token) = &self.config.token {
            cmd.arg("-H").arg(format!("Authorization: Bearer {token}"));
        }
        cmd.arg(url).stdin(Stdio::null());
        cmd
    }

    /// GET `url` and deserialize the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, tag: &str) -> Result<T> {
        debug!(%url, "curl");
        let output = self
            .curl(url, true)
            .output()
            .await
            .map_err(|e| command_failed("curl", e))?;
        if !output.status.success() {
            return Err(Error::Transport {
                url: url.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let (body, status) = split_status(&stdout).ok_or_else(|| Error::InvalidResponse {
            url: url.to_string(),
            message: "missing HTTP status".to_string(),
        })?;
        check_status(status, url, tag)?;

        serde_json::from_str(body).map_err(|e| Error::InvalidResponse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn download(&self, url: &str, tag: &str, dest: &Path) -> Result<()> {
        debug!(%url, dest = %dest.display(), "download archive");
        let output = self
            .curl(url, false)
            .arg("-o")
            .arg(dest)
            .output()
            .await
            .map_err(|e| command_failed("curl", e))?;
        if !output.status.success() {
            return Err(Error::Transport {
                url: url.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let status = split_status(&stdout).map_or("", |(_, status)| status);
        check_status(status, url, tag)
    }

    async fn unpack(&self, archive: &Path, dest: &Path) -> Result<()> {
        debug!(archive = %archive.display(), dest = %dest.display(), "tar");
        let output = Command::new("tar")
            .arg("-xzf")
            .arg(archive)
            .arg("-C")
            .arg(dest)
            .arg("--strip-components=1")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| command_failed("tar", e))?;
        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: "tar".to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ReleaseProvider for GitHubReleases {
    async fn latest_release(&self) -> Result<Release> {
        let url = format!("{}/latest", self.releases_url());
        self.get_json(&url, "latest").await
    }

    async fn release_by_tag(&self, tag: &str) -> Result<Release> {
        let url = format!("{}/tags/{}", self.releases_url(), tag);
        self.get_json(&url, tag).await
    }

    async fn releases(&self) -> Result<Vec<Release>> {
        let url = format!("{}?per_page=100", self.releases_url());
        self.get_json(&url, "releases").await
    }

    async fn extract_release(&self, tag: &str) -> Result<ExtractedRelease> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("speck-{tag}-"))
            .tempdir()?;
        let archive = tempfile::Builder::new()
            .prefix("speck-archive-")
            .suffix(".tar.gz")
            .tempfile()?;

        self.download(&self.archive_url(tag), tag, archive.path())
            .await?;
        self.unpack(archive.path(), dir.path()).await?;

        Ok(ExtractedRelease::new(tag, dir))
    }
}

fn command_failed(command: &str, error: std::io::Error) -> Error {
    Error::CommandFailed {
        command: command.to_string(),
        message: error.to_string(),
    }
}

/// Split curl output into body and the status code written by `-w`.
fn split_status(stdout: &str) -> Option<(&str, &str)> {
    let idx = stdout.rfind(STATUS_MARKER)?;
    Some((&stdout[..idx], stdout[idx + STATUS_MARKER.len()..].trim()))
}

fn check_status(status: &str, url: &str, tag: &str) -> Result<()> {
    match status {
        "404" => Err(Error::NotFound {
            tag: tag.to_string(),
        }),
        s if s.starts_with('2') => Ok(()),
        other => Err(Error::Transport {
            url: url.to_string(),
            message: format!("HTTP {other}"),
        }),
    }
}
