use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rand::TryRngCore;

use super::load::config_path;
use super::types::{AppSettings, ConfigError};

const TEMP_ATTEMPTS: usize = 5;

/// Persist settings to the default config location.
pub fn save(settings: &AppSettings) -> Result<(), ConfigError> {
    let path = config_path()?;
    save_to_path(settings, &path)
}

/// Save settings to a specific path, creating parent directories as needed.
///
/// The file is written to a sibling temp file and renamed into place so a
/// crash never leaves a half-written config behind.
pub fn save_to_path(settings: &AppSettings, path: &Path) -> Result<(), ConfigError> {
    let dir = path.parent().ok_or_else(|| write_error(path, "config path has no parent"))?;
    fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    atomic_write(path, dir, data.as_bytes())
}

fn atomic_write(path: &Path, dir: &Path, data: &[u8]) -> Result<(), ConfigError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| write_error(path, "config path has no file name"))?
        .to_string_lossy()
        .into_owned();

    let mut last_err = None;
    for _ in 0..TEMP_ATTEMPTS {
        let tmp_path = dir.join(format!("{file_name}.tmp-{}", random_suffix(path)?));
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&tmp_path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                last_err = Some(err);
                continue;
            }
            Err(source) => {
                return Err(ConfigError::Write {
                    path: tmp_path,
                    source,
                });
            }
        };
        if let Err(source) = file.write_all(data).and_then(|()| file.sync_all()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ConfigError::Write {
                path: tmp_path,
                source,
            });
        }
        drop(file);
        if let Err(source) = replace_file(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(ConfigError::Write {
                path: path.to_path_buf(),
                source,
            });
        }
        sync_parent_dir(dir)?;
        tracing::debug!("Saved settings to {}", path.display());
        return Ok(());
    }

    Err(ConfigError::Write {
        path: path.to_path_buf(),
        source: io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!(
                "failed to create temporary file: {}",
                last_err
                    .map(|err| err.to_string())
                    .unwrap_or_else(|| "unknown error".into())
            ),
        ),
    })
}

fn random_suffix(path: &Path) -> Result<String, ConfigError> {
    let mut bytes = [0u8; 6];
    rand::rngs::OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|err| write_error(path, &format!("failed to generate temp suffix: {err}")))?;
    Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
}

fn write_error(path: &Path, message: &str) -> ConfigError {
    ConfigError::Write {
        path: PathBuf::from(path),
        source: io::Error::other(message.to_string()),
    }
}

fn replace_file(temp_path: &Path, path: &Path) -> Result<(), io::Error> {
    match fs::rename(temp_path, path) {
        Ok(()) => Ok(()),
        Err(err) => {
            #[cfg(target_os = "windows")]
            if err.kind() == io::ErrorKind::AlreadyExists
                || err.kind() == io::ErrorKind::PermissionDenied
            {
                if let Err(inner) = fs::remove_file(path) {
                    if inner.kind() != io::ErrorKind::NotFound {
                        return Err(inner);
                    }
                }
                return fs::rename(temp_path, path);
            }
            Err(err)
        }
    }
}

fn sync_parent_dir(dir: &Path) -> Result<(), ConfigError> {
    #[cfg(unix)]
    {
        fs::File::open(dir)
            .and_then(|handle| handle.sync_all())
            .map_err(|source| ConfigError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
    }
    #[cfg(not(unix))]
    {
        let _ = dir;
    }
    Ok(())
}
