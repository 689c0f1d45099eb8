//! Client configuration with environment overrides.
//!
//! # Responsibility
//! - Resolve the backend base URL, page size, data dir and log level.
//!
//! # Invariants
//! - Every value has a built-in default; invalid overrides fall back to it.
//! - `api_base_url` never ends with `/`.

use crate::api::DEFAULT_PAGE_SIZE;
use crate::logging::default_log_level;
use log::warn;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://dy-backend.codeindia.tech/api";

pub const ENV_API_URL: &str = "TASKBOARD_API_URL";
pub const ENV_PAGE_SIZE: &str = "TASKBOARD_PAGE_SIZE";
pub const ENV_DATA_DIR: &str = "TASKBOARD_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "TASKBOARD_LOG_LEVEL";

const DATA_DIR_NAME: &str = "taskboard";
const DB_FILE_NAME: &str = "taskboard.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root, e.g. `https://host/api`.
    pub api_base_url: String,
    /// Todos requested per page.
    pub page_size: u32,
    /// Directory holding the preference database and logs.
    pub data_dir: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            data_dir: env::temp_dir().join(DATA_DIR_NAME),
            log_level: default_log_level().to_string(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            let url = url.trim().trim_end_matches('/');
            if url.is_empty() {
                warn!("event=config_load module=config status=fallback key={ENV_API_URL}");
            } else {
                config.api_base_url = url.to_string();
            }
        }

        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            match raw.trim().parse::<u32>() {
                Ok(value) if value > 0 => config.page_size = value,
                _ => warn!(
                    "event=config_load module=config status=fallback key={} value={}",
                    ENV_PAGE_SIZE, raw
                ),
            }
        }

        if let Some(dir) = lookup(ENV_DATA_DIR) {
            if !dir.trim().is_empty() {
                config.data_dir = PathBuf::from(dir.trim());
            }
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            if !level.trim().is_empty() {
                config.log_level = level.trim().to_ascii_lowercase();
            }
        }

        config
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientConfig, DEFAULT_API_BASE_URL, ENV_API_URL, ENV_DATA_DIR, ENV_PAGE_SIZE};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn overrides_are_applied_and_normalized() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, " http://localhost:5000/api/ "),
            (ENV_PAGE_SIZE, "25"),
            (ENV_DATA_DIR, "/tmp/tb"),
        ]));
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/tb/taskboard.sqlite3"));
    }

    #[test]
    fn invalid_page_size_falls_back() {
        for raw in ["0", "-3", "ten"] {
            let config = ClientConfig::from_lookup(lookup(&[(ENV_PAGE_SIZE, raw)]));
            assert_eq!(config.page_size, 10);
        }
    }
}
