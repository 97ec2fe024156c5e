//! Per-invocation context: project root, settings and release provider.

use std::path::{Path, PathBuf};

use speck_core::{Settings, SettingsOverrides, SettingsResolver, VersionMarker, VersionStore};
use speck_release::{GitHubConfig, GitHubReleases};

use crate::cli::Cli;
use crate::error::Result;

pub struct Context {
    pub root: PathBuf,
    pub settings: Settings,
    pub provider: GitHubReleases,
}

impl Context {
    /// Resolve settings for `root` from the global config and CLI/env overrides.
    pub fn resolve(root: &Path, cli: &Cli) -> Result<Self> {
        let overrides = SettingsOverrides {
            repository: cli.repository.clone(),
            api_base: cli.api_base.clone(),
            token: cli.token.clone().filter(|token| !token.is_empty()),
            ignore: Vec::new(),
        };
        let settings = SettingsResolver::new().resolve(&overrides)?;
        Ok(Self::with_settings(root, settings))
    }

    pub fn with_settings(root: &Path, settings: Settings) -> Self {
        let provider = GitHubReleases::new(GitHubConfig {
            repository: settings.repository.clone(),
            api_base: settings.api_base.clone(),
            archive_base: settings.archive_base.clone(),
            timeout_secs: settings.timeout_secs,
            token: settings.token.clone(),
        });
        Self {
            root: root.to_path_buf(),
            settings,
            provider,
        }
    }

    pub fn versions(&self) -> VersionStore {
        VersionStore::local(&self.root)
    }

    pub fn current_version(&self) -> Result<Option<VersionMarker>> {
        Ok(self.versions().read_version()?)
    }
}
