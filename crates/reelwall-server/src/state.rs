use reelwall_config::SearchConfig;
use reelwall_sources::MetadataSource;
use std::sync::Arc;

/// Shared by every handler. Holds the only copy of the upstream credential,
/// inside `source`.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn MetadataSource>,
    pub search: SearchConfig,
}

impl AppState {
    pub fn new(source: Arc<dyn MetadataSource>, search: SearchConfig) -> Self {
        Self { source, search }
    }
}
