use async_trait::async_trait;
use reelwall_models::{MediaKind, MediaSummary};
use crate::error::SourceError;

/// Anything that can answer the two questions the poster wall asks:
/// what matches a query, and how long is a given title.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// Search movies, shows and people. An empty query falls back to the
    /// configured default term.
    async fn search(&self, query: &str) -> Result<Vec<MediaSummary>, SourceError>;

    /// Total runtime in minutes for a movie, or for every episode of a show
    async fn lookup_runtime(&self, id: u64, kind: MediaKind) -> Result<u64, SourceError>;
}
