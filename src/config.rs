//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/curmit/curmit.toml`
//! 3. Environment variables: `CURMIT_*` prefix
//! 4. Command-line flags: `--root`, `--test`, `--no-log`

use std::path::{Path, PathBuf};

use config::{Config, Environment};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::cli::Options;
use crate::errors::SettingsError;

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub root: Option<PathBuf>,
    pub user: Option<String>,
    pub log_downloads: Option<bool>,
}

/// Effective configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root sharing directory (default: ~/curmit)
    pub root: PathBuf,
    /// User to run as (default: unset)
    pub user: Option<String>,
    /// Keep a log of downloaded text
    pub log_downloads: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: default_root(),
            user: None,
            log_downloads: true,
        }
    }
}

fn default_root() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join("curmit"))
        .unwrap_or_else(|| PathBuf::from("~/curmit"))
}

/// Get the XDG config directory for curmit.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "curmit").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("curmit.toml"))
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

impl Settings {
    /// Load defaults, the global config file and `CURMIT_*` variables.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Like [`Settings::load`], reading the config file at `path` instead of
    /// the global one. A missing file is skipped.
    pub fn load_from(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_env(path, Environment::with_prefix("CURMIT").prefix_separator("_"))
    }

    pub(crate) fn load_with_env(
        path: Option<&Path>,
        env: Environment,
    ) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(path) = path {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        current = current.apply_env_overrides(env)?;
        current.expand_paths();

        Ok(current)
    }

    /// Overlay values that were explicitly specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            root: overlay.root.clone().unwrap_or_else(|| self.root.clone()),
            user: overlay.user.clone().or_else(|| self.user.clone()),
            log_downloads: overlay.log_downloads.unwrap_or(self.log_downloads),
        }
    }

    /// Apply environment variables as explicit overrides.
    fn apply_env_overrides(mut self, env: Environment) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Some(root) = optional(config.get_string("root"))? {
            self.root = PathBuf::from(root);
        }
        if let Some(user) = optional(config.get_string("user"))? {
            self.user = Some(user);
        }
        if let Some(log_downloads) = optional(config.get_bool("log_downloads"))? {
            self.log_downloads = log_downloads;
        }

        Ok(self)
    }

    /// Apply the hidden overrides and `--no-log` from the command line.
    pub fn with_options(mut self, options: &Options) -> Self {
        if let Some(root) = &options.root {
            self.root = root.clone();
            self.expand_paths();
        }
        if let Some(user) = &options.test_user {
            self.user = Some(user.clone());
        }
        if options.no_log {
            self.log_downloads = false;
        }
        self
    }

    /// Expand `~`, `$VAR` and `${VAR}` in `root`.
    fn expand_paths(&mut self) {
        let raw = self.root.to_string_lossy().into_owned();
        if let Ok(expanded) = shellexpand::full(&raw) {
            self.root = PathBuf::from(expanded.as_ref());
        }
    }
}

/// Treat a missing key as "not set" and anything else as an error.
fn optional<T>(value: Result<T, config::ConfigError>) -> Result<Option<T>, SettingsError> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(config::ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: config::ConfigError) -> SettingsError {
    SettingsError::Invalid {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use config::Map;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("CURMIT")
            .prefix_separator("_")
            .source(Some(source))
    }

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load_with_env(None, env(&[])).expect("load defaults");
        assert!(settings.root.ends_with("curmit"));
        assert_eq!(settings.user, None);
        assert!(settings.log_downloads);
    }

    #[test]
    fn given_env_vars_when_loading_then_they_override_defaults() {
        let settings = Settings::load_with_env(
            None,
            env(&[
                ("CURMIT_ROOT", "/srv/share"),
                ("CURMIT_USER", "JaneDoe"),
                ("CURMIT_LOG_DOWNLOADS", "false"),
            ]),
        )
        .expect("load with env");

        assert_eq!(settings.root, PathBuf::from("/srv/share"));
        assert_eq!(settings.user.as_deref(), Some("JaneDoe"));
        assert!(!settings.log_downloads);
    }

    #[test]
    fn given_invalid_bool_in_env_when_loading_then_errors() {
        let result = Settings::load_with_env(None, env(&[("CURMIT_LOG_DOWNLOADS", "maybe")]));
        assert!(matches!(result, Err(SettingsError::Invalid { .. })));
    }

    #[test]
    fn given_tilde_in_root_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            root: PathBuf::from("~/shared"),
            ..Settings::default()
        };
        settings.expand_paths();

        let root = settings.root.to_string_lossy().into_owned();
        assert!(!root.starts_with('~'), "tilde not expanded: {root}");
        assert!(root.ends_with("shared"));
    }

    #[test]
    fn given_cli_overrides_when_applied_then_they_win() {
        let options = Options::parse_from(["curmit", "--root", "/tmp/x", "--test", "JohnDoe", "-q"]);
        let settings = Settings {
            root: PathBuf::from("/srv/share"),
            user: Some("JaneDoe".into()),
            log_downloads: true,
        }
        .with_options(&options);

        assert_eq!(settings.root, PathBuf::from("/tmp/x"));
        assert_eq!(settings.user.as_deref(), Some("JohnDoe"));
        assert!(!settings.log_downloads);
    }

    #[test]
    fn given_no_cli_overrides_when_applied_then_keeps_settings() {
        let options = Options::parse_from(["curmit"]);
        let base = Settings {
            root: PathBuf::from("/srv/share"),
            user: None,
            log_downloads: true,
        };
        assert_eq!(base.clone().with_options(&options), base);
    }
}
