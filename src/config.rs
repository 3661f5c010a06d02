//! Installer configuration.
//!
//! This module provides the [`InstallerConfig`] struct describing which
//! repository is installed and how external commands are run. Every field has
//! a default, so a config file only needs to name what it overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Upstream repository cloned into the target directory.
pub const DEFAULT_REPOSITORY_URL: &str = "https://github.com/cosmo-lang/cosmo.git";

/// Configuration for an installation run.
///
/// # Default Behavior
///
/// The defaults install `cosmo-lang/cosmo` from `origin/master` into a
/// folder named `cosmo`, remove a stale `shard.lock` before updating an
/// existing checkout, and never time out external commands.
///
/// # Example
///
/// ```rust
/// use cosmo_installer::InstallerConfig;
///
/// let config: InstallerConfig = toml::from_str(r#"
///     branch = "main"
///     command_timeout_secs = 600
/// "#).unwrap();
///
/// assert_eq!(config.branch, "main");
/// assert_eq!(config.remote, "origin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Git URL cloned on a fresh install.
    pub repository_url: String,

    /// Remote pulled from when the target directory already has content.
    pub remote: String,

    /// Branch pulled from `remote`.
    pub branch: String,

    /// Project folder name, prefixed with `.` outside Windows.
    pub project_dir_name: String,

    /// Lock artifact left by `shards` that blocks re-runs when stale.
    pub lock_file: String,

    /// Upper bound for a single external command, in seconds.
    ///
    /// Default: `None` (wait for the command indefinitely)
    pub command_timeout_secs: Option<u64>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            repository_url: DEFAULT_REPOSITORY_URL.to_string(),
            remote: "origin".to_string(),
            branch: "master".to_string(),
            project_dir_name: "cosmo".to_string(),
            lock_file: "shard.lock".to_string(),
            command_timeout_secs: None,
        }
    }
}

impl InstallerConfig {
    /// Load a configuration file in TOML format.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The configured command timeout, if any.
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

/// Errors raised while loading an [`InstallerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = InstallerConfig::default();
        assert_eq!(config.repository_url, DEFAULT_REPOSITORY_URL);
        assert_eq!(config.remote, "origin");
        assert_eq!(config.branch, "master");
        assert_eq!(config.project_dir_name, "cosmo");
        assert_eq!(config.lock_file, "shard.lock");
        assert!(config.command_timeout().is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: InstallerConfig = toml::from_str("command_timeout_secs = 90").unwrap();
        assert_eq!(config.command_timeout(), Some(Duration::from_secs(90)));
        assert_eq!(config.branch, "master");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "repository_url = \"https://example.com/fork.git\"").unwrap();
        writeln!(file, "lock_file = \"custom.lock\"").unwrap();

        let config = InstallerConfig::load(file.path()).unwrap();
        assert_eq!(config.repository_url, "https://example.com/fork.git");
        assert_eq!(config.lock_file, "custom.lock");
        assert_eq!(config.remote, "origin");
    }

    #[test]
    fn test_load_missing_file() {
        let result = InstallerConfig::load(Path::new("/nonexistent/cosmo-installer.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "branch = [").unwrap();

        let result = InstallerConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
