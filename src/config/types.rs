use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::defaults::{
    clamp_page_size, clamp_request_timeout, default_base_url, default_log_level,
    default_page_size, default_request_timeout_secs, normalize_base_url,
};

/// Settings stored in the TOML config file.
///
/// Config keys (TOML): `api`, `list`, `logging`, `last_route`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub list: ListSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Route shown when the console last closed, e.g. `/metrics`.
    #[serde(default)]
    pub last_route: Option<String>,
}

impl AppSettings {
    pub(super) fn normalized(mut self) -> Self {
        self.api.base_url = normalize_base_url(&self.api.base_url).unwrap_or_else(|| {
            tracing::warn!(
                "Ignoring invalid api.base_url {:?}; using {}",
                self.api.base_url,
                default_base_url()
            );
            default_base_url()
        });
        self.api.request_timeout_secs = clamp_request_timeout(self.api.request_timeout_secs);
        self.list.page_size = clamp_page_size(self.list.page_size);
        self
    }

    /// Apply the `DATAHUB_API_URL` override when it holds a valid URL.
    pub(super) fn with_api_url_override(mut self, value: Option<String>) -> Self {
        let Some(value) = value else {
            return self;
        };
        match normalize_base_url(&value) {
            Some(url) => self.api.base_url = url,
            None => tracing::warn!("Ignoring invalid {} value {:?}", super::API_URL_ENV, value),
        }
        self
    }
}

/// Backend connection settings.
///
/// Config keys: `base_url`, `request_timeout_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// List page preferences.
///
/// Config keys: `page_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSettings {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Logging preferences; `RUST_LOG` still takes precedence.
///
/// Config keys: `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Errors that may occur while loading or saving console configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to create the config directory.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write a config file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to serialize config to TOML.
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
    /// No usable config directory found.
    #[error("No suitable config directory found")]
    NoConfigDir,
}
