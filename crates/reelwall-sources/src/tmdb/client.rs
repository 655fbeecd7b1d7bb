use crate::error::SourceError;
use crate::tmdb::records::{self, ImageUrls};
use crate::traits::MetadataSource;
use async_trait::async_trait;
use reelwall_config::{SearchConfig, TmdbConfig};
use reelwall_models::{MediaKind, MediaSummary};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Direct client for the TMDB v3 API, authenticated with an `api_key` query
/// parameter.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    api_base: String,
    images: ImageUrls,
    include_adult: bool,
    default_query: String,
    result_limit: usize,
}

impl TmdbClient {
    pub fn new(api_key: String, tmdb: &TmdbConfig, search: &SearchConfig) -> Result<Self, SourceError> {
        if api_key.trim().is_empty() {
            return Err(SourceError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(tmdb.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            api_base: tmdb.api_base.trim_end_matches('/').to_string(),
            images: ImageUrls::new(tmdb.image_base.clone(), tmdb.placeholder_url.clone()),
            include_adult: tmdb.include_adult,
            default_query: search.default_query.clone(),
            result_limit: search.result_limit,
        })
    }

    /// The query actually sent upstream: blank input means the default term
    pub fn effective_query<'a>(&'a self, query: &'a str) -> &'a str {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            &self.default_query
        } else {
            trimmed
        }
    }

    async fn get_json(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, SourceError> {
        let url = format!("{}{}", self.api_base, path);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::from_status(response.status()));
        }

        Ok(response.json::<Value>().await?)
    }

    /// Fetch `/{type}/{id}` and return the raw payload
    pub async fn get_details(&self, id: u64, kind: MediaKind) -> Result<Value, SourceError> {
        if !kind.has_runtime() {
            return Err(SourceError::UnsupportedKind(kind));
        }
        self.get_json(&format!("/{}/{}", kind.as_str(), id), &[]).await
    }
}

#[async_trait]
impl MetadataSource for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<MediaSummary>, SourceError> {
        let query = self.effective_query(query);
        debug!(query = %query, "Searching TMDB");

        let include_adult = if self.include_adult { "true" } else { "false" };
        let payload = self
            .get_json(
                "/search/multi",
                &[("query", query), ("page", "1"), ("include_adult", include_adult)],
            )
            .await?;

        let summaries = records::summaries_from_payload(&payload, self.result_limit, &self.images)?;
        debug!(query = %query, count = summaries.len(), "TMDB search complete");
        Ok(summaries)
    }

    async fn lookup_runtime(&self, id: u64, kind: MediaKind) -> Result<u64, SourceError> {
        let details = self.get_details(id, kind).await?;
        let minutes = records::runtime_minutes(kind, &details);
        let episodes = details.get("number_of_episodes").and_then(Value::as_u64);

        info!(
            operation = "runtime_lookup",
            media_type = %kind,
            id,
            title = records::details_title(kind, &details),
            episodes,
            runtime_minutes = minutes,
            "Computed runtime"
        );
        Ok(minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base: &str) -> TmdbClient {
        let tmdb = TmdbConfig {
            api_base: base.to_string(),
            ..TmdbConfig::default()
        };
        TmdbClient::new("secret".to_string(), &tmdb, &SearchConfig::default()).unwrap()
    }

    async fn echo_search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        if params.get("api_key").map(String::as_str) != Some("secret") {
            return Json(json!({"status_message": "bad key"}));
        }
        Json(json!({
            "page": 1,
            "results": [{
                "id": 1,
                "title": params.get("query").cloned().unwrap_or_default(),
                "overview": format!("{}|{}", params["page"], params["include_adult"]),
                "media_type": "movie"
            }]
        }))
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = TmdbClient::new(" ".to_string(), &TmdbConfig::default(), &SearchConfig::default());
        assert!(matches!(result, Err(SourceError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_search_sends_key_and_defaults_query() {
        let base = spawn_upstream(Router::new().route("/search/multi", get(echo_search))).await;
        let client = client_for(&base);

        let results = client.search("").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Movie");
        assert_eq!(results[0].overview, "1|true");

        let results = client.search("the matrix & co").await.unwrap();
        assert_eq!(results[0].title, "the matrix & co");
    }

    #[tokio::test]
    async fn test_search_non_success_status() {
        let router = Router::new().route(
            "/search/multi",
            get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"status_code": 7}))) }),
        );
        let client = client_for(&spawn_upstream(router).await);

        let err = client.search("x").await.unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_search_bad_shape() {
        let router = Router::new().route("/search/multi", get(|| async { Json(json!({"results": "nope"})) }));
        let client = client_for(&spawn_upstream(router).await);

        assert!(matches!(client.search("x").await, Err(SourceError::Shape(_))));
    }

    #[tokio::test]
    async fn test_lookup_runtime_routes_by_kind() {
        let router = Router::new()
            .route("/movie/{id}", get(|Path(id): Path<u64>| async move {
                Json(json!({"id": id, "original_title": "Heat", "runtime": 170}))
            }))
            .route("/tv/{id}", get(|Path(id): Path<u64>| async move {
                Json(json!({"id": id, "original_name": "Dark", "episode_run_time": [20, 25, 30], "number_of_episodes": 10}))
            }));
        let client = client_for(&spawn_upstream(router).await);

        assert_eq!(client.lookup_runtime(949, MediaKind::Movie).await.unwrap(), 170);
        assert_eq!(client.lookup_runtime(70523, MediaKind::Tv).await.unwrap(), 250);
    }

    #[tokio::test]
    async fn test_lookup_runtime_rejects_people() {
        let client = client_for("http://127.0.0.1:9");
        let err = client.lookup_runtime(1, MediaKind::Person).await.unwrap_err();
        assert!(matches!(err, SourceError::UnsupportedKind(MediaKind::Person)));
    }

    #[tokio::test]
    async fn test_network_error_hides_api_key() {
        // Nothing listens on the discard port
        let client = client_for("http://127.0.0.1:9");
        let err = client.search("x").await.unwrap_err();
        assert!(matches!(err, SourceError::Http(_)));
        assert!(!err.to_string().contains("secret"));
    }
}
