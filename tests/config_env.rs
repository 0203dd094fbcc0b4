mod support;

use datahub::app_dirs;
use datahub::config::{self, AppSettings};
use support::datahub_env::DatahubEnvGuard;

#[test]
fn missing_file_yields_defaults_under_config_home() {
    let temp = tempfile::tempdir().expect("tempdir");
    let _env = DatahubEnvGuard::set_config_home(temp.path().to_path_buf());
    let settings = config::load_or_default().expect("defaults");
    assert_eq!(settings, AppSettings::default());
    let root = app_dirs::app_root_dir().expect("app root");
    assert!(root.starts_with(temp.path()));
    assert!(root.is_dir());
}

#[test]
fn api_url_env_overrides_the_saved_value() {
    let temp = tempfile::tempdir().expect("tempdir");
    let env = DatahubEnvGuard::set_config_home(temp.path().to_path_buf());
    let mut settings = AppSettings::default();
    settings.api.base_url = "http://saved.example:8000".into();
    settings.list.page_size = 25;
    config::save(&settings).expect("save");

    let loaded = config::load_or_default().expect("load");
    assert_eq!(loaded.api.base_url, "http://saved.example:8000");
    assert_eq!(loaded.list.page_size, 25);

    env.set_api_url("http://override.example:9000");
    let loaded = config::load_or_default().expect("load with override");
    assert_eq!(loaded.api.base_url, "http://override.example:9000");

    env.set_api_url("not a url");
    let loaded = config::load_or_default().expect("load with bad override");
    assert_eq!(loaded.api.base_url, "http://saved.example:8000");
}
