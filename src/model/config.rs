use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Base URL used when neither the flag, the environment, nor config set one
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable that overrides `[api] base_url`
pub const BASE_URL_ENV: &str = "TASKBOARD_API_URL";

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Terminal cells per day in the Gantt grid
    #[serde(default = "default_day_width")]
    pub day_width: u16,
    /// Width of the sticky task-name column in the Gantt view
    #[serde(default = "default_name_width")]
    pub name_width: u16,
    /// Hex color overrides keyed by theme slot (e.g. `highlight = "#FB4196"`)
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            day_width: default_day_width(),
            name_width: default_name_width(),
            colors: HashMap::new(),
        }
    }
}

fn default_day_width() -> u16 {
    3
}

fn default_name_width() -> u16 {
    28
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. `debug` or `taskboard=trace`
    #[serde(default)]
    pub level: Option<String>,
}
