use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: u64 = 1440;
const MINUTES_PER_HOUR: u64 = 60;

/// A runtime split into whole days, hours and minutes.
///
/// Serialized as `{"DD": .., "HH": .., "MM": ..}`, the shape the runtime
/// endpoint has always returned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RuntimeBreakdown {
    #[serde(rename = "DD")]
    pub days: u64,
    #[serde(rename = "HH")]
    pub hours: u64,
    #[serde(rename = "MM")]
    pub minutes: u64,
}

impl RuntimeBreakdown {
    pub fn from_minutes(total_minutes: u64) -> Self {
        Self {
            days: total_minutes / MINUTES_PER_DAY,
            hours: (total_minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR,
            minutes: total_minutes % MINUTES_PER_HOUR,
        }
    }

    pub fn total_minutes(&self) -> u64 {
        self.days * MINUTES_PER_DAY + self.hours * MINUTES_PER_HOUR + self.minutes
    }

    pub fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0
    }
}
