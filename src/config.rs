//! Application configuration.
//!
//! Read from YAML; every field has a default so a missing or partial file
//! still yields a usable configuration.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use text_injector::{EditorQuirks, DEFAULT_RICH_EDITOR_HOSTS};

pub const APP_DIR: &str = "prompt-favorites";
pub const CONFIG_FILE: &str = "config.yaml";
pub const SETTINGS_FILE: &str = "settings.json";

pub const STORAGE_ENV: &str = "PROMPT_FAVORITES_STORAGE";
pub const DEBUG_ENV: &str = "PROMPT_FAVORITES_DEBUG";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Settings file; defaults to `<data_dir>/prompt-favorites/settings.json`.
    pub storage_path: Option<PathBuf>,
    pub log_level: String,
    /// Verbose logging here and in rendered page scripts.
    pub debug: bool,
    pub rich_editor_hosts: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            log_level: "info".to_string(),
            debug: false,
            rich_editor_hosts: DEFAULT_RICH_EDITOR_HOSTS
                .iter()
                .map(|host| host.to_string())
                .collect(),
        }
    }
}

impl AppConfig {
    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| env::var(key).ok());
    }

    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(STORAGE_ENV).filter(|value| !value.trim().is_empty()) {
            self.storage_path = Some(PathBuf::from(path));
        }
        if let Some(flag) = lookup(DEBUG_ENV) {
            self.debug = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
    }

    pub fn storage_path(&self) -> PathBuf {
        self.storage_path.clone().unwrap_or_else(default_storage_path)
    }

    pub fn editor_quirks(&self) -> EditorQuirks {
        EditorQuirks {
            rich_editor_hosts: self.rich_editor_hosts.clone(),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

pub fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(SETTINGS_FILE)
}
