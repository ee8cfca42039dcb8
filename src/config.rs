//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/budgetctl/budgetctl.toml`
//! 3. Explicit config file (`--config <file>`)
//! 4. Environment variables: `BUDGETCTL_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::NodeId;

/// Unified configuration for budgetctl.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the budget service
    pub server_url: String,
    /// Category whose children form the top level
    pub root_id: NodeId,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Default user name offered by `login`
    pub username: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            root_id: 1,
            timeout_secs: 10,
            connect_timeout_secs: 2,
            username: None,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub server_url: Option<String>,
    pub root_id: Option<NodeId>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub username: Option<String>,
}

/// Get the XDG config directory for budgetctl.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "budgetctl").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("budgetctl.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the input as is.
fn expand_env_vars(value: &str) -> String {
    shellexpand::full(value)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

impl Settings {
    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            server_url: overlay
                .server_url
                .clone()
                .unwrap_or_else(|| self.server_url.clone()),
            root_id: overlay.root_id.unwrap_or(self.root_id),
            timeout_secs: overlay.timeout_secs.unwrap_or(self.timeout_secs),
            connect_timeout_secs: overlay
                .connect_timeout_secs
                .unwrap_or(self.connect_timeout_secs),
            username: overlay.username.clone().or_else(|| self.username.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; must exist if given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(path) = config_file {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_values();
        current.validate()?;
        Ok(current)
    }

    /// Apply BUDGETCTL_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("BUDGETCTL").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("server_url") {
            settings.server_url = val;
        }
        if let Ok(val) = config.get_int("root_id") {
            settings.root_id = val;
        }
        if let Ok(val) = config.get::<u64>("timeout_secs") {
            settings.timeout_secs = val;
        }
        if let Ok(val) = config.get::<u64>("connect_timeout_secs") {
            settings.connect_timeout_secs = val;
        }
        if let Ok(val) = config.get_string("username") {
            settings.username = Some(val);
        }
        Ok(settings)
    }

    fn expand_values(&mut self) {
        self.server_url = expand_env_vars(&self.server_url);
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        let url = self.server_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ApplicationError::Config {
                message: format!("server_url must start with http:// or https://: {url}"),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ApplicationError::Config {
                message: "timeout_secs must be positive".into(),
            });
        }
        Ok(())
    }

    /// Override the server from the command line.
    pub fn with_server(mut self, server_url: Option<&str>) -> Result<Self, ApplicationError> {
        if let Some(url) = server_url {
            self.server_url = expand_env_vars(url);
            self.validate()?;
        }
        Ok(self)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# budgetctl configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/budgetctl/budgetctl.toml
#   File:   --config <file>
#   Env:    BUDGETCTL_* environment variables (e.g. BUDGETCTL_SERVER_URL)

# Base URL of the budget service ($VAR and ~ are expanded)
# server_url = "http://127.0.0.1:5000"

# Category whose children form the top level
# root_id = 1

# Request timeouts in seconds
# timeout_secs = 10
# connect_timeout_secs = 2

# User name offered by `login`
# username = "alice"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
