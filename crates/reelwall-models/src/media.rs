use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of record returned by the metadata API's multi search.
///
/// Only `Movie` and `Tv` have a runtime lookup; `Person` results still show
/// up in searches (their poster comes from `known_for`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
    Person,
    #[default]
    #[serde(other)]
    Unknown,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
            MediaKind::Person => "person",
            MediaKind::Unknown => "unknown",
        }
    }

    pub fn is_tv(&self) -> bool {
        matches!(self, MediaKind::Tv)
    }

    /// Whether the upstream API has a detail endpoint carrying runtime data
    pub fn has_runtime(&self) -> bool {
        matches!(self, MediaKind::Movie | MediaKind::Tv)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "tv" => Ok(MediaKind::Tv),
            "person" => Ok(MediaKind::Person),
            other => Err(format!("Unsupported media type: {}", other)),
        }
    }
}

/// Normalized search hit, shaped for the poster wall.
///
/// Field names on the wire match what the browser client reads
/// (`url`, `release_date`, `media_type`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaSummary {
    pub id: u64,
    #[serde(rename = "url")]
    pub poster_url: String,
    pub title: String,
    pub overview: String,
    pub release_date: String,
    #[serde(default)]
    pub media_type: MediaKind,
}
