use super::{apply_env, apply_file, parse_flag, LoadedSettings, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn defaults_point_at_public_inventory() {
    let settings = Settings::default();
    assert!(settings.api_base_url.ends_with("/api/v1/carsmovies"));
    assert_eq!(settings.bind_addr, "0.0.0.0:8050");
    assert_eq!(settings.page_size, 100);
    assert!(!settings.debug);
    assert_eq!(settings.log_filter(), "info");
}

#[test]
fn settings_file_accepts_strings_integers_and_booleans() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("car_movies_dashboard_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("dashboard.toml");
    fs::write(
        &path,
        "api_base_url = \"http://127.0.0.1:9000/api/v1/carsmovies\"\npage_size = 5\ndebug = true\nrequest_timeout_secs = \"3\"\n",
    )
    .expect("write settings");

    let mut loaded = LoadedSettings::default();
    apply_file(&mut loaded, &path);
    let settings = &loaded.settings;

    assert_eq!(settings.api_base_url, "http://127.0.0.1:9000/api/v1/carsmovies");
    assert_eq!(settings.page_size, 5);
    assert_eq!(settings.request_timeout_secs, 3);
    assert!(settings.debug);
    assert_eq!(settings.log_filter(), "debug");
    assert!(loaded.warnings.is_empty());

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn missing_file_keeps_defaults_quietly() {
    let mut loaded = LoadedSettings::default();
    apply_file(&mut loaded, Path::new("/definitely/not/here/dashboard.toml"));
    assert_eq!(loaded.settings, Settings::default());
    assert!(loaded.warnings.is_empty(), "a missing file is not a problem");
}

#[test]
fn malformed_file_is_reported_after_load() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("car_movies_dashboard_bad_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("dashboard.toml");
    fs::write(&path, "page_size = [unterminated").expect("write settings");

    let mut loaded = LoadedSettings::default();
    apply_file(&mut loaded, &path);

    assert_eq!(loaded.settings, Settings::default());
    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].contains("unreadable settings file"));

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let mut loaded = LoadedSettings::default();
    apply_env(
        &mut loaded,
        env_of(&[
            ("DASHBOARD_BIND", "127.0.0.1:1"),
            ("APP__BIND_ADDR", "127.0.0.1:2"),
            ("INVENTORY_API_URL", "http://inventory.test/movies"),
        ]),
    );
    assert_eq!(loaded.settings.bind_addr, "127.0.0.1:2");
    assert_eq!(loaded.settings.api_base_url, "http://inventory.test/movies");
}

#[test]
fn invalid_values_are_ignored_and_reported() {
    let mut loaded = LoadedSettings::default();
    apply_env(
        &mut loaded,
        env_of(&[
            ("APP__PAGE_SIZE", "lots"),
            ("APP__REQUEST_TIMEOUT_SECS", "0"),
            ("APP__DEBUG", "maybe"),
        ]),
    );
    assert_eq!(loaded.settings, Settings::default());
    assert_eq!(loaded.warnings.len(), 3);
    assert!(loaded.warnings[0].contains("page_size 'lots'"));
    assert!(loaded.warnings[2].contains("debug flag 'maybe'"));
}

#[test]
fn debug_flag_spellings() {
    assert_eq!(parse_flag("ON"), Some(true));
    assert_eq!(parse_flag(" 0 "), Some(false));
    assert_eq!(parse_flag("debug"), None);
}
