pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, ConfigError, LayoutConfig, SearchConfig, ServerConfig, TmdbConfig};
pub use credentials::{resolve_api_key, CredentialStore, API_KEY_ENV_VARS};
pub use paths::{container_base_path, PathManager};
