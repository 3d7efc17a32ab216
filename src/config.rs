use std::path::{Path, PathBuf};
use std::time::Duration;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::credentials::CredentialManager;
use crate::core::thesaurus::{ListMode, DEFAULT_ENDPOINT};

/// Directory name used under the platform config/data roots.
const APP_DIR: &str = "thesaurus-tui";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
    /// Enable mouse support in the terminal.
    pub mouse_enabled: bool,
}

/// Thesaurus service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL; the url-encoded query is appended as a path segment.
    pub endpoint: String,
    /// Inline API key. Prefer the environment or the keyring.
    pub api_key: Option<String>,
    /// Environment variable consulted for the API key.
    pub api_key_env: String,
    /// Per-request timeout. No timeout when unset.
    pub request_timeout_secs: Option<u64>,
}

/// Search behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period after the last keystroke before a search is submitted.
    pub debounce_ms: u64,
    /// Initial list mode.
    pub mode: ListMode,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            mouse_enabled: false,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            api_key_env: "THESAURUS_API_KEY".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            mode: ListMode::Entries,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("No thesaurus API key configured")]
    #[diagnostic(code(thesaurus::config::missing_api_key))]
    MissingApiKey {
        #[help]
        help: String,
    },

    #[error("Failed to read config file {}", path.display())]
    #[diagnostic(code(thesaurus::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}", path.display())]
    #[diagnostic(
        code(thesaurus::config::parse),
        help("Check the TOML syntax; unknown keys are ignored, wrong types are not")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ============================================================================
// Loading
// ============================================================================

impl AppConfig {
    /// Load configuration from `~/.config/thesaurus-tui/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if !config_path.exists() {
            log::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Self::default();
        }

        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}, using defaults");
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit path. Errors are reported, not defaulted.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tui.tick_rate_ms.max(1))
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Resolve the API key: inline config, then the environment, then the keyring.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        self.resolve_api_key_with(|| match CredentialManager::new().get_api_key() {
            Ok(key) => Some(key),
            Err(e) => {
                log::debug!("No API key from keyring: {e}");
                None
            }
        })
    }

    /// Same as [`ApiConfig::resolve_api_key`] with the keyring lookup supplied.
    pub fn resolve_api_key_with(
        &self,
        keyring: impl FnOnce() -> Option<String>,
    ) -> Result<String, ConfigError> {
        let from_env = std::env::var(&self.api_key_env).ok();

        let key = non_blank(self.api_key.as_deref())
            .or_else(|| non_blank(from_env.as_deref()))
            .map(str::to_string)
            .or_else(|| keyring().filter(|k| !k.trim().is_empty()));

        key.ok_or_else(|| ConfigError::MissingApiKey {
            help: format!(
                "Set {}, add `api_key` under [api] in {}, or run `thesaurus key set <KEY>`",
                self.api_key_env,
                AppConfig::config_path().display()
            ),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
