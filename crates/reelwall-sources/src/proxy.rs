use crate::error::SourceError;
use crate::traits::MetadataSource;
use async_trait::async_trait;
use reelwall_models::{MediaKind, MediaSummary, RuntimeBreakdown};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Body of a successful `GET /runtime`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuntimeResponse {
    #[serde(rename = "totalRuntimeMinutes")]
    pub total_runtime_minutes: u64,
    #[serde(rename = "runTimeDays")]
    pub run_time_days: RuntimeBreakdown,
}

impl RuntimeResponse {
    pub fn from_minutes(total_runtime_minutes: u64) -> Self {
        Self {
            total_runtime_minutes,
            run_time_days: RuntimeBreakdown::from_minutes(total_runtime_minutes),
        }
    }
}

/// Client for a running Reelwall proxy. Holds no credential; the proxy
/// appends its own key upstream.
#[derive(Clone)]
pub struct ProxyClient {
    client: Client,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MetadataSource for ProxyClient {
    fn source_name(&self) -> &str {
        "proxy"
    }

    async fn search(&self, query: &str) -> Result<Vec<MediaSummary>, SourceError> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("query", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::from_status(response.status()));
        }
        Ok(response.json::<Vec<MediaSummary>>().await?)
    }

    async fn lookup_runtime(&self, id: u64, kind: MediaKind) -> Result<u64, SourceError> {
        let uid = id.to_string();
        let response = self
            .client
            .get(format!("{}/runtime", self.base_url))
            .query(&[("uid", uid.as_str()), ("type", kind.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::from_status(response.status()));
        }
        let body: RuntimeResponse = response.json().await?;
        Ok(body.total_runtime_minutes)
    }
}
