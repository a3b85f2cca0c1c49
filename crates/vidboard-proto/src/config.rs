use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::pagination::PAGE_SIZE;
use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Catalog document: `bundled`, a file path, or an http(s):// URL in
    /// development mode.
    #[serde(default = "default_catalog")]
    pub catalog: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Open a video window.  `false` plays audio only.
    #[serde(default = "default_show_video")]
    pub show_video: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Key/value file holding per-video trim ranges.
    #[serde(default = "default_trims_file")]
    pub trims_file: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            catalog: default_catalog(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            show_video: default_show_video(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            trims_file: default_trims_file(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8990
}

fn default_catalog() -> String {
    crate::catalog::BUNDLED_SOURCE.to_string()
}

fn default_server_url() -> String {
    format!("http://{}:{}", default_bind_address(), default_port())
}

fn default_page_size() -> u32 {
    PAGE_SIZE
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_poll_interval_ms() -> u64 {
    200
}

fn default_volume() -> f32 {
    0.5
}

fn default_show_video() -> bool {
    true
}

fn default_trims_file() -> PathBuf {
    platform::data_dir().join("trims.json")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8990);
        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.server.catalog, "bundled");
        assert_eq!(config.dashboard.server_url, "http://127.0.0.1:8990");
        assert_eq!(config.dashboard.page_size, 10);
        assert_eq!(config.dashboard.search_debounce_ms, 500);
        assert_eq!(config.dashboard.poll_interval_ms, 200);
        assert!(config.player.show_video);
        assert!(config.paths.trims_file.ends_with("vidboard/trims.json"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000

            [player]
            show_video = false
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert!(!config.player.show_video);
        assert_eq!(config.player.volume, 0.5);
        assert_eq!(config.dashboard.page_size, 10);
    }
}
