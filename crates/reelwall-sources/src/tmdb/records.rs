use reelwall_models::{MediaKind, MediaSummary};
use serde::Deserialize;
use serde_json::Value;
use crate::error::SourceError;

pub const UNTITLED: &str = "Untitled";
pub const NO_OVERVIEW: &str = "No description available.";
pub const UNKNOWN_RELEASE: &str = "Unknown release date";

/// Where poster paths get resolved against
#[derive(Debug, Clone)]
pub struct ImageUrls {
    pub image_base: String,
    pub placeholder: String,
}

impl ImageUrls {
    pub fn new(image_base: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            image_base: image_base.into(),
            placeholder: placeholder.into(),
        }
    }

    fn resolve(&self, path: &str) -> String {
        format!("{}{}", self.image_base.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct KnownFor {
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// One entry of `/search/multi` results. Movies carry `title`/`release_date`,
/// shows carry `name`/`first_air_date`, people carry `known_for`.
#[derive(Debug, Default, Deserialize)]
pub struct RawMediaRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub known_for: Option<Vec<KnownFor>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub media_type: Option<MediaKind>,
}

// Empty strings count as missing in every fallback chain
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl RawMediaRecord {
    pub fn poster_url(&self, images: &ImageUrls) -> String {
        let known_for_poster = self
            .known_for
            .as_ref()
            .and_then(|items| items.first())
            .and_then(|item| present(&item.poster_path));

        present(&self.poster_path)
            .or_else(|| present(&self.backdrop_path))
            .or(known_for_poster)
            .map(|path| images.resolve(path))
            .unwrap_or_else(|| images.placeholder.clone())
    }

    /// `raw` is the record as received; when no name field exists at all the
    /// record itself stands in for the title.
    pub fn title(&self, raw: &Value) -> String {
        if let Some(title) = present(&self.title)
            .or_else(|| present(&self.name))
            .or_else(|| present(&self.original_name))
        {
            return title.to_string();
        }
        match raw.as_object() {
            Some(map) if !map.is_empty() => raw.to_string(),
            _ => UNTITLED.to_string(),
        }
    }

    // first_air_date doubles as overview text for shows without one
    pub fn overview(&self) -> String {
        present(&self.overview)
            .or_else(|| present(&self.first_air_date))
            .unwrap_or(NO_OVERVIEW)
            .to_string()
    }

    pub fn release_date(&self) -> String {
        present(&self.release_date)
            .or_else(|| present(&self.first_air_date))
            .unwrap_or(UNKNOWN_RELEASE)
            .to_string()
    }

    pub fn into_summary(self, raw: &Value, images: &ImageUrls) -> MediaSummary {
        MediaSummary {
            id: self.id.unwrap_or_default(),
            poster_url: self.poster_url(images),
            title: self.title(raw),
            overview: self.overview(),
            release_date: self.release_date(),
            media_type: self.media_type.unwrap_or_default(),
        }
    }
}

/// Normalize a `/search/multi` payload, keeping the first `limit` results in
/// upstream order.
pub fn summaries_from_payload(
    payload: &Value,
    limit: usize,
    images: &ImageUrls,
) -> Result<Vec<MediaSummary>, SourceError> {
    let results = payload
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| SourceError::Shape("results is not an array".to_string()))?;

    results
        .iter()
        .take(limit)
        .map(|raw| {
            let record: RawMediaRecord = serde_json::from_value(raw.clone())?;
            Ok(record.into_summary(raw, images))
        })
        .collect()
}

/// Loose numeric read: numbers as-is, numeric strings parsed, anything else 0
fn coerce_number(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// Upper bound for a single title's runtime, far beyond any real show
pub const MAX_RUNTIME_MINUTES: u64 = 1_000_000_000;

fn to_minutes(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        (value.round() as u64).min(MAX_RUNTIME_MINUTES)
    } else {
        0
    }
}

/// Total runtime in minutes from a `/movie/{id}` or `/tv/{id}` payload.
///
/// Shows with more than one `episode_run_time` entry use the mean episode
/// length times `number_of_episodes`. Everything else, including shows with
/// zero or one entry, reads the top-level `runtime` field, which TMDB does
/// not populate for shows.
pub fn runtime_minutes(kind: MediaKind, details: &Value) -> u64 {
    if kind.is_tv() {
        if let Some(run_times) = details.get("episode_run_time").and_then(Value::as_array) {
            if run_times.len() > 1 {
                let sum: f64 = run_times.iter().map(|v| coerce_number(Some(v))).sum();
                let average = sum / run_times.len() as f64;
                let episodes = coerce_number(details.get("number_of_episodes")).trunc();
                return to_minutes(average * episodes);
            }
        }
        tracing::debug!(
            operation = "tv_runtime_fallback",
            "Show has fewer than two episode run times, reading runtime field"
        );
    }
    to_minutes(coerce_number(details.get("runtime")))
}

/// Display name used in runtime logs
pub fn details_title(kind: MediaKind, details: &Value) -> &str {
    let field = if kind.is_tv() { "original_name" } else { "original_title" };
    details.get(field).and_then(Value::as_str).unwrap_or("?")
}
