use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::media::MediaKind;
use crate::runtime::RuntimeBreakdown;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchListEntry {
    pub id: u64, // Same id as the MediaSummary it was added from
    pub title: String,
    pub release_date: String,
    pub media_type: MediaKind,
    pub runtime_minutes: u64,
    pub runtime_breakdown: RuntimeBreakdown,
    pub added_at: DateTime<Utc>,
}

impl WatchListEntry {
    pub fn new(id: u64, title: String, release_date: String, media_type: MediaKind, runtime_minutes: u64) -> Self {
        Self {
            id,
            title,
            release_date,
            media_type,
            runtime_minutes,
            runtime_breakdown: RuntimeBreakdown::from_minutes(runtime_minutes),
            added_at: Utc::now(),
        }
    }

    /// Per-item runtime line shown in the watch-list panel
    pub fn runtime_label(&self) -> String {
        if self.runtime_minutes == 0 {
            return "Run time unavailable".to_string();
        }
        let b = &self.runtime_breakdown;
        format!("{} days, {} hours, {} minutes", b.days, b.hours, b.minutes)
    }
}
