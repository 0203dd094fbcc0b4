//! Console settings persisted as `config.toml` inside the `.datahub` folder.

use crate::app_dirs;

mod defaults;
mod load;
mod save;
mod types;

#[cfg(test)]
mod tests;

/// Default filename used to store the console configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "DATAHUB_API_URL";

pub use load::{config_path, load_from_path, load_or_default};
pub use save::{save, save_to_path};
pub use types::{ApiSettings, AppSettings, ConfigError, ListSettings, LoggingSettings};

fn map_app_dir_error(error: app_dirs::AppDirError) -> ConfigError {
    match error {
        app_dirs::AppDirError::NoBaseDir => ConfigError::NoConfigDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            ConfigError::CreateDir { path, source }
        }
    }
}
