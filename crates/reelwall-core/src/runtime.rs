use reelwall_models::{RuntimeBreakdown, WatchListEntry};

pub fn to_breakdown(total_minutes: u64) -> RuntimeBreakdown {
    RuntimeBreakdown::from_minutes(total_minutes)
}

pub fn sum_runtimes<'a, I>(entries: I) -> u64
where
    I: IntoIterator<Item = &'a WatchListEntry>,
{
    entries
        .into_iter()
        .fold(0u64, |total, entry| total.saturating_add(entry.runtime_minutes))
}

pub fn total_breakdown<'a, I>(entries: I) -> RuntimeBreakdown
where
    I: IntoIterator<Item = &'a WatchListEntry>,
{
    to_breakdown(sum_runtimes(entries))
}

/// Aggregate line for the watch-list header
pub fn total_label(breakdown: &RuntimeBreakdown) -> String {
    format!(
        "{} Days {} Hours {} Mins",
        breakdown.days, breakdown.hours, breakdown.minutes
    )
}
