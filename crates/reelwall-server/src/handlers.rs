use crate::errors::{AppError, AppResult};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use reelwall_models::{MediaKind, MediaSummary};
use reelwall_sources::RuntimeResponse;
use serde::Deserialize;
use tracing::{debug, error};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RuntimeParams {
    pub uid: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// `GET /search?query=...`
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<MediaSummary>>> {
    let query = match non_blank(params.query) {
        Some(query) => query,
        None if state.search.require_query => return Err(AppError::bad_request("Missing query")),
        None => state.search.default_query.clone(),
    };
    debug!(query = %query, "Search request");

    let results = state.source.search(&query).await.map_err(|e| {
        error!(operation = "search", query = %query, error = %e, "Upstream search failed");
        AppError::internal("Error fetching results")
    })?;
    Ok(Json(results))
}

/// `GET /runtime?uid=...&type=movie|tv`
pub async fn runtime_handler(
    State(state): State<AppState>,
    Query(params): Query<RuntimeParams>,
) -> AppResult<Json<RuntimeResponse>> {
    let (Some(uid), Some(kind)) = (non_blank(params.uid), non_blank(params.kind)) else {
        return Err(AppError::bad_request("Missing uid or type"));
    };

    let id: u64 = uid
        .trim()
        .parse()
        .map_err(|_| AppError::bad_request(format!("Invalid uid: {}", uid)))?;
    let kind = kind
        .parse::<MediaKind>()
        .ok()
        .filter(MediaKind::has_runtime)
        .ok_or_else(|| AppError::bad_request("Unsupported media type"))?;

    let minutes = state.source.lookup_runtime(id, kind).await.map_err(|e| {
        error!(operation = "runtime_lookup", id, media_type = %kind, error = %e, "Upstream runtime lookup failed");
        AppError::internal("Error fetching runtime data")
    })?;
    Ok(Json(RuntimeResponse::from_minutes(minutes)))
}
