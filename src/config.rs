//! Configuration for the landreg client.
//!
//! Settings are read from `landreg.toml` and layered:
//! file → environment → CLI flags.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! base_url = "https://land-management-backend-app.onrender.com/api"
//! agents_path = "/users/agents-fonciers"
//! timeout_secs = 30
//!
//! [storage]
//! dir = "/home/me/.local/share/landreg"
//!
//! [ui]
//! locale = "fr"
//!
//! [logging]
//! filter = "landreg=debug"
//! json = false
//! ```
//!
//! Environment overrides: `LANDREG_API_URL`, `LANDREG_LOCALE`,
//! `LANDREG_STORAGE_DIR`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{DEFAULT_AGENTS_PATH, DEFAULT_BASE_URL};
use crate::i18n::Locale;

pub const CONFIG_FILE_NAME: &str = "landreg.toml";
pub const ENV_API_URL: &str = "LANDREG_API_URL";
pub const ENV_LOCALE: &str = "LANDREG_LOCALE";
pub const ENV_STORAGE_DIR: &str = "LANDREG_STORAGE_DIR";

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the agent listing, relative to `base_url`
    #[serde(default = "default_agents_path")]
    pub agents_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_agents_path() -> String {
    DEFAULT_AGENTS_PATH.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            agents_path: default_agents_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSection {
    /// Directory holding the persisted session (default: user data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiSection {
    #[serde(default)]
    pub locale: Locale,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// `tracing` filter directive, used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "landreg=info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

/// Contents of `landreg.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandregToml {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub ui: UiSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl LandregToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse landreg.toml")
    }

    /// Returns default configuration if the file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize landreg.toml")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let url = self.api.base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            warnings.push(format!(
                "Invalid base_url '{}': should start with http:// or https://",
                url
            ));
        }

        if self.api.timeout_secs == 0 {
            warnings.push("timeout_secs is 0: every request would time out".to_string());
        }

        if !self.api.agents_path.starts_with('/') {
            warnings.push(format!(
                "agents_path '{}' should start with '/'",
                self.api.agents_path
            ));
        }

        warnings
    }
}

/// Values given on the command line. `None` means not given.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub api_url: Option<String>,
    pub json_logs: bool,
    pub verbose: bool,
}

/// Default location: `<user config dir>/landreg/landreg.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("landreg")
        .join(CONFIG_FILE_NAME)
}

fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("landreg")
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct LandregConfig {
    /// Path the file was (or would be) read from
    pub path: PathBuf,
    /// Parsed file contents, before environment and CLI overrides
    pub toml: LandregToml,
    pub base_url: String,
    pub agents_path: String,
    pub timeout: Duration,
    pub storage_dir: PathBuf,
    pub locale: Locale,
    pub log_filter: String,
    pub json_logs: bool,
    pub verbose: bool,
}

impl LandregConfig {
    /// Resolve against the process environment.
    pub fn load(cli: CliOverrides) -> Result<Self> {
        Self::resolve(cli, |key| std::env::var(key).ok())
    }

    /// Resolve file → `env` → CLI.
    pub fn resolve(cli: CliOverrides, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let path = cli.config_path.clone().unwrap_or_else(default_config_path);
        let toml = LandregToml::load_or_default(&path)?;

        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let base_url = cli
            .api_url
            .or_else(|| env(ENV_API_URL))
            .unwrap_or_else(|| toml.api.base_url.clone());

        let locale = match env(ENV_LOCALE) {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid {} value", ENV_LOCALE))?,
            None => toml.ui.locale,
        };

        let storage_dir = env(ENV_STORAGE_DIR)
            .map(PathBuf::from)
            .or_else(|| toml.storage.dir.clone())
            .unwrap_or_else(default_storage_dir);

        let log_filter = if cli.verbose {
            "landreg=debug".to_string()
        } else {
            toml.logging.filter.clone()
        };

        Ok(Self {
            path,
            base_url,
            agents_path: toml.api.agents_path.clone(),
            timeout: Duration::from_secs(toml.api.timeout_secs),
            storage_dir,
            locale,
            log_filter,
            json_logs: cli.json_logs || toml.logging.json,
            verbose: cli.verbose,
            toml,
        })
    }

    /// Warnings for the file plus any invalid override.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = self.toml.validate();
        if self.base_url != self.toml.api.base_url
            && !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://"))
        {
            warnings.push(format!(
                "Invalid API URL override '{}': should start with http:// or https://",
                self.base_url
            ));
        }
        warnings
    }
}
