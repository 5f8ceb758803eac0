use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.json";
pub const API_URL_ENV: &str = "BEEHIVE_API_URL";
pub const DATA_DIR_ENV: &str = "BEEHIVE_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiRoutes {
    pub messages: String,
    pub send_message: String,
    pub directory: String,
    pub notifications: String,
    pub mark_seen: String,
    pub login: String,
}

impl Default for ApiRoutes {
    fn default() -> Self {
        Self {
            messages: "/messages".into(),
            send_message: "/messages".into(),
            directory: "/directory".into(),
            notifications: "/notifications".into(),
            mark_seen: "/notifications/mark_seen".into(),
            login: "/auth/login".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub chat_poll_secs: u64,
    pub badge_poll_secs: u64,
    pub notification_page_size: u32,
    pub routes: ApiRoutes,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000".into(),
            data_dir: PathBuf::from("data"),
            chat_poll_secs: 5,
            badge_poll_secs: 10,
            notification_page_size: 5,
            routes: ApiRoutes::default(),
        }
    }
}

impl AppConfig {
    pub fn chat_poll_period(&self) -> Duration {
        Duration::from_secs(self.chat_poll_secs.max(1))
    }

    pub fn badge_poll_period(&self) -> Duration {
        Duration::from_secs(self.badge_poll_secs.max(1))
    }

    pub fn page_size(&self) -> u32 {
        self.notification_page_size.max(1)
    }

    /// Environment wins over the file (`.env` is loaded by `main` first).
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(DATA_DIR_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, api_url: Option<String>, data_dir: Option<String>) {
        if let Some(url) = api_url.filter(|url| !url.trim().is_empty()) {
            log::info!("Using API base URL from {API_URL_ENV}");
            self.api_base_url = url.trim().to_string();
        }
        if let Some(dir) = data_dir.filter(|dir| !dir.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir.trim());
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}
