use super::*;
use tempfile::tempdir;

fn with_config_home<T>(dir: &std::path::Path, f: impl FnOnce() -> T) -> T {
    let _guard = crate::app_dirs::ConfigBaseGuard::set(dir.to_path_buf());
    f()
}

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let loaded = load_from_path(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(loaded, AppSettings::default());
    assert_eq!(loaded.api.base_url, "http://localhost:8000");
    assert_eq!(loaded.list.page_size, 10);
}

#[test]
fn saves_and_reloads_settings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let settings = AppSettings {
        api: ApiSettings {
            base_url: "https://datahub.internal:9000".into(),
            request_timeout_secs: 12,
        },
        list: ListSettings { page_size: 25 },
        last_route: Some("/experiments/7".into()),
        ..AppSettings::default()
    };
    save_to_path(&settings, &path).unwrap();
    assert_eq!(load_from_path(&path).unwrap(), settings);

    let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp-"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn partial_file_fills_missing_sections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[list]\npage_size = 20\n").unwrap();
    let loaded = load_from_path(&path).unwrap();
    assert_eq!(loaded.list.page_size, 20);
    assert_eq!(loaded.api, ApiSettings::default());
    assert_eq!(loaded.logging.level, "info");
}

#[test]
fn out_of_range_values_are_normalized() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[api]\nbase_url = \"not a url\"\nrequest_timeout_secs = 0\n[list]\npage_size = 5000\n",
    )
    .unwrap();
    let loaded = load_from_path(&path).unwrap();
    assert_eq!(loaded.api.base_url, "http://localhost:8000");
    assert_eq!(loaded.api.request_timeout_secs, 1);
    assert_eq!(loaded.list.page_size, 100);
}

#[test]
fn trailing_slash_is_stripped_from_base_url() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api]\nbase_url = \" http://10.0.0.5:8000/ \"\n").unwrap();
    assert_eq!(load_from_path(&path).unwrap().api.base_url, "http://10.0.0.5:8000");
}

#[test]
fn invalid_toml_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[list\npage_size = ").unwrap();
    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn api_url_override_replaces_base_url_only_when_valid() {
    let settings = AppSettings::default()
        .with_api_url_override(Some("https://staging.example.com/".into()));
    assert_eq!(settings.api.base_url, "https://staging.example.com");

    let settings = AppSettings::default().with_api_url_override(Some("ftp://nope".into()));
    assert_eq!(settings.api.base_url, "http://localhost:8000");

    let settings = AppSettings::default().with_api_url_override(None);
    assert_eq!(settings, AppSettings::default());
}

#[test]
fn save_uses_config_home() {
    let dir = tempdir().unwrap();
    with_config_home(dir.path(), || {
        let settings = AppSettings {
            last_route: Some("/segments".into()),
            ..AppSettings::default()
        };
        save(&settings).unwrap();
        let expected = dir
            .path()
            .join(crate::app_dirs::APP_DIR_NAME)
            .join(CONFIG_FILE_NAME);
        assert_eq!(config_path().unwrap(), expected);
        assert!(expected.is_file());
        assert_eq!(load_from_path(&expected).unwrap(), settings);
    });
}
