use crate::proxy::ProxyClient;
use crate::tmdb::TmdbClient;
use crate::traits::MetadataSource;
use crate::error::SourceError;
use anyhow::Result;
use reelwall_config::{resolve_api_key, Config, CredentialStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Pick the metadata source for a command: a running proxy when `server` is
/// given, otherwise TMDB directly with the locally resolved API key.
pub fn build_source(
    config: &Config,
    credentials: &CredentialStore,
    server: Option<&str>,
) -> Result<Arc<dyn MetadataSource>> {
    let timeout = Duration::from_secs(config.tmdb.request_timeout_secs);

    if let Some(url) = server {
        debug!(server = %url, "Using Reelwall proxy as metadata source");
        return Ok(Arc::new(ProxyClient::new(url, timeout)?));
    }

    let api_key = resolve_api_key(credentials).ok_or(SourceError::MissingApiKey)?;
    debug!("Using TMDB directly as metadata source");
    Ok(Arc::new(TmdbClient::new(api_key, &config.tmdb, &config.search)?))
}
