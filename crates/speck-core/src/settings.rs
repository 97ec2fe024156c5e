//! Settings resolution
//!
//! Settings come from three layers, later ones overriding earlier ones:
//! 1. Built-in defaults
//! 2. The global config file (`<config_dir>/speck/config.toml`, or `.yaml`
//!    / `.json`)
//! 3. Command-line and environment overrides

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use speck_fs::ConfigStore;
use tracing::debug;

use crate::Result;

pub const DEFAULT_REPOSITORY: &str = "telum-ai/speck";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_ARCHIVE_BASE: &str = "https://github.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const CONFIG_FILES: &[&str] = &["config.toml", "config.yaml", "config.yml", "config.json"];

/// Effective settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `owner/name` of the template repository
    pub repository: String,
    pub api_base: String,
    pub archive_base: String,
    pub timeout_secs: u64,
    /// Extra ignore patterns for legacy sync
    pub ignore: Vec<String>,
    /// Bearer token for the release API; never read from or written to disk
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repository: DEFAULT_REPOSITORY.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            archive_base: DEFAULT_ARCHIVE_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            ignore: Vec::new(),
            token: None,
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub repository: Option<String>,
    pub api_base: Option<String>,
    pub token: Option<String>,
    pub ignore: Vec<String>,
}

/// Resolves [`Settings`] from defaults, the global file and overrides.
#[derive(Debug, Default)]
pub struct SettingsResolver {
    /// Override for the global config directory (used for testing).
    global_config_dir_override: Option<PathBuf>,
}

impl SettingsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `dir` instead of `<config_dir>/speck`.
    pub fn with_global_config_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            global_config_dir_override: Some(dir.into()),
        }
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref dir) = self.global_config_dir_override {
            return Some(dir.clone());
        }
        dirs::config_dir().map(|d| d.join("speck"))
    }

    /// The first global config file that exists, if any.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        let dir = self.global_config_dir()?;
        CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Merge all layers.
    ///
    /// # Errors
    ///
    /// Fails if the global config file exists but cannot be parsed.
    pub fn resolve(&self, overrides: &SettingsOverrides) -> Result<Settings> {
        let mut settings = match self.global_config_path() {
            Some(path) => {
                debug!(path = %path.display(), "loading global settings");
                ConfigStore::new().load::<Settings>(&path)?
            }
            None => Settings::default(),
        };

        if let Some(repository) = &overrides.repository {
            settings.repository = repository.clone();
        }
        if let Some(api_base) = &overrides.api_base {
            settings.api_base = api_base.clone();
        }
        if overrides.token.is_some() {
            settings.token = overrides.token.clone();
        }
        settings.ignore.extend(overrides.ignore.iter().cloned());

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_global_file() {
        let temp = TempDir::new().unwrap();
        let settings = SettingsResolver::with_global_config_dir(temp.path())
            .resolve(&SettingsOverrides::default())
            .unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn global_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.toml"),
            "repository = \"acme/speck-fork\"\ntimeout_secs = 5\nignore = [\"docs/**\"]\n",
        )
        .unwrap();

        let settings = SettingsResolver::with_global_config_dir(temp.path())
            .resolve(&SettingsOverrides::default())
            .unwrap();

        assert_eq!(settings.repository, "acme/speck-fork");
        assert_eq!(settings.timeout_secs, 5);
        assert_eq!(settings.ignore, vec!["docs/**"]);
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn overrides_win_and_ignores_accumulate() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.json"),
            r#"{"repository": "acme/from-file", "ignore": ["docs/**"]}"#,
        )
        .unwrap();

        let overrides = SettingsOverrides {
            repository: Some("acme/from-env".into()),
            api_base: Some("http://127.0.0.1:9".into()),
            token: Some("secret".into()),
            ignore: vec!["*.tmp".into()],
        };
        let settings = SettingsResolver::with_global_config_dir(temp.path())
            .resolve(&overrides)
            .unwrap();

        assert_eq!(settings.repository, "acme/from-env");
        assert_eq!(settings.api_base, "http://127.0.0.1:9");
        assert_eq!(settings.token.as_deref(), Some("secret"));
        assert_eq!(settings.ignore, vec!["docs/**", "*.tmp"]);
    }

    #[test]
    fn malformed_global_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.toml"), "repository = [").unwrap();
        let result = SettingsResolver::with_global_config_dir(temp.path())
            .resolve(&SettingsOverrides::default());
        assert!(result.is_err());
    }
}
