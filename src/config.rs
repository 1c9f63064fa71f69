//! Client configuration.
//!
//! Stored as YAML at `<config dir>/config.yaml` (or wherever
//! `ARCALOAD_CONFIG` points) and covers:
//! - The catalog server's base URL
//! - Search debounce and minimum query length
//! - Notification lifetime and post-mutation refresh delays
//! - HTTP request timeout

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::coordinator::CoordinatorSettings;
use crate::error::{ArcaloadError, Result};
use crate::gateway::RefreshDelays;
use crate::search::SearchSettings;

pub const CONFIG_PATH_ENV: &str = "ARCALOAD_CONFIG";
pub const BASE_URL_ENV: &str = "ARCALOAD_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Catalog server root (default: http://127.0.0.1:5000)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Quiet period before a search runs
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Shorter queries hide the results instead of searching
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    #[serde(default = "default_toast_lifetime_ms")]
    pub toast_lifetime_ms: u64,

    /// Delay before refreshing after a game is added
    #[serde(default = "default_add_reload_delay_ms")]
    pub add_reload_delay_ms: u64,

    /// Delay before refreshing after a delete or status update
    #[serde(default = "default_mutation_reload_delay_ms")]
    pub mutation_reload_delay_ms: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

fn default_toast_lifetime_ms() -> u64 {
    3000
}

fn default_add_reload_delay_ms() -> u64 {
    1500
}

fn default_mutation_reload_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_debounce_ms: default_search_debounce_ms(),
            min_query_len: default_min_query_len(),
            toast_lifetime_ms: default_toast_lifetime_ms(),
            add_reload_delay_ms: default_add_reload_delay_ms(),
            mutation_reload_delay_ms: default_mutation_reload_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Where the config file lives, if a location can be determined
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV)
            && !path.is_empty()
        {
            return Some(PathBuf::from(path));
        }
        directories::ProjectDirs::from("com", "arcaload", "arcaload")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Load the config file, or defaults if there is none, then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path).map_err(|e| {
                    ArcaloadError::Io(std::io::Error::new(
                        e.kind(),
                        format!("Failed to read config at {}: {}", path.display(), e),
                    ))
                })?;
                Self::from_yaml(&content)?
            }
            _ => Self::default(),
        };

        if let Ok(base_url) = env::var(BASE_URL_ENV)
            && !base_url.is_empty()
        {
            config.base_url = base_url;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ClientConfig = serde_yaml_ng::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ArcaloadError::Config("base_url must not be empty".to_string()));
        }
        if self.min_query_len == 0 {
            return Err(ArcaloadError::Config(
                "min_query_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn toast_lifetime(&self) -> Duration {
        Duration::from_millis(self.toast_lifetime_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn refresh_delays(&self) -> RefreshDelays {
        RefreshDelays {
            add: Duration::from_millis(self.add_reload_delay_ms),
            mutation: Duration::from_millis(self.mutation_reload_delay_ms),
        }
    }

    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            search: SearchSettings {
                debounce: self.search_debounce(),
                min_query_chars: self.min_query_len,
            },
            refresh_delays: self.refresh_delays(),
            toast_lifetime: self.toast_lifetime(),
        }
    }
}
