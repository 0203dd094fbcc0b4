use std::path::{Path, PathBuf};

use crate::app_dirs;

use super::types::{AppSettings, ConfigError};
use super::{API_URL_ENV, CONFIG_FILE_NAME, map_app_dir_error};

/// Resolve the configuration file path, ensuring the parent directory exists.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Load settings from disk, returning defaults if the file is missing.
///
/// `DATAHUB_API_URL` replaces `api.base_url` after the file is read.
pub fn load_or_default() -> Result<AppSettings, ConfigError> {
    let path = config_path()?;
    let settings = load_from_path(&path)?;
    Ok(settings.with_api_url_override(std::env::var(API_URL_ENV).ok()))
}

/// Load settings from a specific file, normalizing out-of-range values.
pub fn load_from_path(path: &Path) -> Result<AppSettings, ConfigError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<AppSettings>(&text)
        .map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
        .map(AppSettings::normalized)
}
