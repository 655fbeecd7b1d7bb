use reelwall_models::MediaKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),
    #[error("Error fetching data: {status} {reason}")]
    Status { status: u16, reason: String },
    #[error("Invalid data structure: {0}")]
    Shape(String),
    #[error("No API key configured (set API_KEY or run `reelwall config api-key`)")]
    MissingApiKey,
    #[error("Unsupported media type: {0}")]
    UnsupportedKind(MediaKind),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        // Request URLs carry the api_key query parameter
        SourceError::Http(err.without_url())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Shape(err.to_string())
    }
}

impl SourceError {
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        SourceError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }
}
