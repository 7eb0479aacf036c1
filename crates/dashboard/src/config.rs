use std::{fs, path::Path, time::Duration};

use client_core::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT};
use shared::domain::DEFAULT_PAGE_SIZE;

pub const SETTINGS_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub bind_addr: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            bind_addr: "0.0.0.0:8050".into(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            debug: false,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

/// Settings plus the values that were skipped while layering them. The
/// warnings are logged by the caller once tracing is installed.
#[derive(Debug, Default)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub warnings: Vec<String>,
}

/// Defaults, then `dashboard.toml` in the working directory, then environment.
pub fn load_settings() -> LoadedSettings {
    let mut loaded = LoadedSettings::default();
    apply_file(&mut loaded, Path::new(SETTINGS_FILE));
    apply_env(&mut loaded, |key| std::env::var(key).ok());
    loaded
}

fn apply_file(loaded: &mut LoadedSettings, path: &Path) {
    let Ok(raw) = fs::read_to_string(path) else {
        return;
    };
    match toml::from_str::<toml::Table>(&raw) {
        Ok(table) => apply_table(loaded, &table),
        Err(err) => loaded.warnings.push(format!(
            "ignoring unreadable settings file {}: {err}",
            path.display()
        )),
    }
}

fn apply_table(loaded: &mut LoadedSettings, table: &toml::Table) {
    apply_values(loaded, |key| table.get(key).and_then(value_as_string));
}

fn value_as_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

fn apply_env(loaded: &mut LoadedSettings, lookup: impl Fn(&str) -> Option<String>) {
    let first = |keys: &[&str]| keys.iter().rev().find_map(|key| lookup(*key));
    apply_values(loaded, |key| match key {
        "api_base_url" => first(&["INVENTORY_API_URL", "APP__API_BASE_URL"]),
        "bind_addr" => first(&["DASHBOARD_BIND", "APP__BIND_ADDR"]),
        "page_size" => first(&["APP__PAGE_SIZE"]),
        "request_timeout_secs" => first(&["APP__REQUEST_TIMEOUT_SECS"]),
        "debug" => first(&["APP__DEBUG"]),
        _ => None,
    });
}

fn apply_values(loaded: &mut LoadedSettings, value: impl Fn(&str) -> Option<String>) {
    let LoadedSettings { settings, warnings } = loaded;
    if let Some(v) = value("api_base_url") {
        settings.api_base_url = v;
    }
    if let Some(v) = value("bind_addr") {
        settings.bind_addr = v;
    }
    if let Some(v) = value("page_size") {
        match v.trim().parse::<u32>() {
            Ok(parsed) if parsed > 0 => settings.page_size = parsed,
            _ => warnings.push(format!("ignoring invalid page_size '{v}'")),
        }
    }
    if let Some(v) = value("request_timeout_secs") {
        match v.trim().parse::<u64>() {
            Ok(parsed) if parsed > 0 => settings.request_timeout_secs = parsed,
            _ => warnings.push(format!("ignoring invalid request_timeout_secs '{v}'")),
        }
    }
    if let Some(v) = value("debug") {
        match parse_flag(&v) {
            Some(flag) => settings.debug = flag,
            None => warnings.push(format!("ignoring invalid debug flag '{v}'")),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
