use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("layout.min_size ({min}) must not exceed layout.max_size ({max})")]
    SizeRange { min: u32, max: u32 },
    #[error("layout.max_attempts must be at least 1")]
    NoAttempts,
    #[error("layout.aspect_ratio must be positive, got {0}")]
    AspectRatio(f64),
    #[error("search.result_limit must be at least 1")]
    EmptyResultLimit,
    #[error("search.default_query cannot be empty")]
    EmptyDefaultQuery,
    #[error("Invalid server.bind address '{0}'")]
    BindAddress(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Upstream metadata API settings. The API key itself lives in the
/// credential store or the environment, never in this file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_image_base")]
    pub image_base: String,
    #[serde(default = "default_placeholder_url")]
    pub placeholder_url: String,
    #[serde(default = "default_true")]
    pub include_adult: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_query")]
    pub default_query: String,
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    /// Reject `/search` without a query instead of falling back to `default_query`
    #[serde(default)]
    pub require_query: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayoutConfig {
    #[serde(default = "default_min_size")]
    pub min_size: u32,
    #[serde(default = "default_max_size")]
    pub max_size: u32,
    // height = width * aspect_ratio (2:3 posters)
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,
    #[serde(default = "default_margin")]
    pub margin: u32,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_true() -> bool {
    true
}

fn default_api_base() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_placeholder_url() -> String {
    "https://via.placeholder.com/200x300".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_query() -> String {
    "Movie".to_string()
}

fn default_result_limit() -> usize {
    30
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_min_size() -> u32 {
    100
}

fn default_max_size() -> u32 {
    200
}

fn default_aspect_ratio() -> f64 {
    1.5
}

fn default_margin() -> u32 {
    10
}

fn default_max_attempts() -> u32 {
    100
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            image_base: default_image_base(),
            placeholder_url: default_placeholder_url(),
            include_adult: default_true(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_query: default_query(),
            result_limit: default_result_limit(),
            require_query: false,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_size: default_min_size(),
            max_size: default_max_size(),
            aspect_ratio: default_aspect_ratio(),
            margin: default_margin(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .parse()
            .map_err(|_| ConfigError::BindAddress(self.bind.clone()))
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if present, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        if layout.min_size > layout.max_size {
            return Err(ConfigError::SizeRange { min: layout.min_size, max: layout.max_size });
        }
        if layout.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        if layout.aspect_ratio.is_nan() || layout.aspect_ratio <= 0.0 {
            return Err(ConfigError::AspectRatio(layout.aspect_ratio));
        }
        if self.search.result_limit == 0 {
            return Err(ConfigError::EmptyResultLimit);
        }
        if self.search.default_query.trim().is_empty() {
            return Err(ConfigError::EmptyDefaultQuery);
        }
        self.server.bind_addr()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.search.require_query = true;
        config.layout.max_attempts = 40;
        config.server.bind = "0.0.0.0:8080".to_string();

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert!(loaded.search.require_query);
        assert_eq!(loaded.layout.max_attempts, 40);
        assert_eq!(loaded.server.bind, "0.0.0.0:8080");
        assert_eq!(loaded.tmdb.api_base, "https://api.themoviedb.org/3");
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let config: Config = toml::from_str("[search]\nresult_limit = 12\n").unwrap();
        assert_eq!(config.search.result_limit, 12);
        assert_eq!(config.search.default_query, "Movie");
        assert_eq!(config.layout, LayoutConfig::default());
        assert!(config.tmdb.include_adult);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.search.result_limit, 30);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.layout.min_size = 300;
        assert_eq!(config.validate(), Err(ConfigError::SizeRange { min: 300, max: 200 }));
        config.layout.min_size = 100;

        config.layout.max_attempts = 0;
        assert_eq!(config.validate(), Err(ConfigError::NoAttempts));
        config.layout.max_attempts = 100;

        config.layout.aspect_ratio = 0.0;
        assert!(config.validate().is_err());
        config.layout.aspect_ratio = 1.5;

        config.search.result_limit = 0;
        assert_eq!(config.validate(), Err(ConfigError::EmptyResultLimit));
        config.search.result_limit = 30;

        config.server.bind = "not an address".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::BindAddress(_))));
    }
}
