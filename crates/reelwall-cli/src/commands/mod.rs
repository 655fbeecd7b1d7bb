pub mod browse;
pub mod config;
pub mod prompts;
pub mod runtime;
pub mod search;
pub mod serve;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use reelwall_config::{Config, CredentialStore, PathManager};
use reelwall_sources::MetadataSource;
use std::sync::Arc;
use tracing::debug;

/// Config, credentials and paths as every command sees them
pub struct Context {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
}

impl Context {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;

        let mut credentials = CredentialStore::new(paths.credentials_file());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials: {}", e))?;

        debug!(
            config = %config_file.display(),
            exists = config_file.exists(),
            "Configuration loaded"
        );
        Ok(Self { paths, config, credentials })
    }

    pub fn source(&self, server: Option<&str>) -> Result<Arc<dyn MetadataSource>> {
        reelwall_sources::build_source(&self.config, &self.credentials, server).map_err(|e| match server {
            Some(url) => eyre!("Failed to connect to proxy at {}: {}", url, e),
            None => eyre!("{} or pass --server to use a running proxy", e),
        })
    }
}
