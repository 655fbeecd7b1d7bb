use crate::layout::LayoutPass;
use crate::runtime;
use reelwall_models::{MediaSummary, RuntimeBreakdown, WatchListEntry};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Sequence number handed out when a search starts. Only the response for
/// the most recently issued ticket is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Proof that an id was reserved by [`Session::begin_add`]
#[derive(Debug)]
pub struct PendingAdd {
    summary: MediaSummary,
}

impl PendingAdd {
    pub fn summary(&self) -> &MediaSummary {
        &self.summary
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AddRejected {
    #[error("already on the watch-list")]
    AlreadyListed,
    #[error("runtime lookup already in flight")]
    Pending,
}

/// Everything the poster wall remembers for one session. Nothing here is
/// persisted.
#[derive(Debug, Default)]
pub struct Session {
    results: Vec<MediaSummary>,
    // Keyed by index into `results`; ids are not unique across movie/tv
    layout: Option<LayoutPass<usize>>,
    watchlist: Vec<WatchListEntry>,
    pending: HashSet<u64>,
    latest_ticket: u64,
    selected: Option<MediaSummary>,
    watchlist_open: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // Displayed results

    pub fn begin_search(&mut self) -> SearchTicket {
        self.latest_ticket += 1;
        SearchTicket(self.latest_ticket)
    }

    /// Sequence number of the most recently issued search
    pub fn search_sequence(&self) -> u64 {
        self.latest_ticket
    }

    pub fn is_latest(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.latest_ticket
    }

    /// Replace the displayed results if `ticket` is still the latest search.
    /// Returns false (and changes nothing) for a stale response.
    pub fn complete_search(&mut self, ticket: SearchTicket, results: Vec<MediaSummary>) -> bool {
        if !self.is_latest(ticket) {
            debug!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                "Discarding stale search response"
            );
            return false;
        }
        self.results = results;
        self.layout = None;
        true
    }

    pub fn results(&self) -> &[MediaSummary] {
        &self.results
    }

    pub fn set_layout(&mut self, layout: LayoutPass<usize>) {
        self.layout = Some(layout);
    }

    pub fn layout(&self) -> Option<&LayoutPass<usize>> {
        self.layout.as_ref()
    }

    // Detail view and panel toggle

    pub fn select(&mut self, id: u64) -> Option<&MediaSummary> {
        self.selected = self.results.iter().find(|r| r.id == id).cloned();
        self.selected.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&MediaSummary> {
        self.selected.as_ref()
    }

    pub fn toggle_watchlist_panel(&mut self) -> bool {
        self.watchlist_open = !self.watchlist_open;
        self.watchlist_open
    }

    pub fn is_watchlist_open(&self) -> bool {
        self.watchlist_open
    }

    // Watch-list

    /// Reserve `summary.id` before its runtime is looked up. A second add for
    /// the same id is rejected until the first completes.
    pub fn begin_add(&mut self, summary: &MediaSummary) -> Result<PendingAdd, AddRejected> {
        if self.contains(summary.id) {
            return Err(AddRejected::AlreadyListed);
        }
        if !self.pending.insert(summary.id) {
            return Err(AddRejected::Pending);
        }
        Ok(PendingAdd {
            summary: summary.clone(),
        })
    }

    pub fn complete_add(&mut self, pending: PendingAdd, runtime_minutes: u64) -> &WatchListEntry {
        let summary = pending.summary;
        self.pending.remove(&summary.id);

        if let Some(index) = self.watchlist.iter().position(|e| e.id == summary.id) {
            return &self.watchlist[index];
        }

        self.watchlist.push(WatchListEntry::new(
            summary.id,
            summary.title,
            summary.release_date,
            summary.media_type,
            runtime_minutes,
        ));
        let last = self.watchlist.len() - 1;
        &self.watchlist[last]
    }

    /// Release a reservation without adding anything
    pub fn abandon_add(&mut self, pending: PendingAdd) {
        self.pending.remove(&pending.summary.id);
    }

    pub fn remove(&mut self, id: u64) -> Option<WatchListEntry> {
        let index = self.watchlist.iter().position(|e| e.id == id)?;
        Some(self.watchlist.remove(index))
    }

    pub fn contains(&self, id: u64) -> bool {
        self.watchlist.iter().any(|e| e.id == id)
    }

    pub fn is_pending(&self, id: u64) -> bool {
        self.pending.contains(&id)
    }

    pub fn watchlist(&self) -> &[WatchListEntry] {
        &self.watchlist
    }

    pub fn total_minutes(&self) -> u64 {
        runtime::sum_runtimes(&self.watchlist)
    }

    pub fn total_breakdown(&self) -> RuntimeBreakdown {
        runtime::total_breakdown(&self.watchlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelwall_models::MediaKind;

    fn summary(id: u64, title: &str) -> MediaSummary {
        MediaSummary {
            id,
            poster_url: format!("https://img/{}.jpg", id),
            title: title.to_string(),
            overview: String::new(),
            release_date: "2020-01-01".to_string(),
            media_type: MediaKind::Movie,
        }
    }

    #[test]
    fn test_stale_search_is_discarded() {
        let mut session = Session::new();
        let first = session.begin_search();
        let second = session.begin_search();

        assert!(session.complete_search(second, vec![summary(2, "New")]));
        assert!(!session.complete_search(first, vec![summary(1, "Old")]));
        assert_eq!(session.results()[0].title, "New");
    }

    #[test]
    fn test_new_results_drop_old_layout() {
        let mut session = Session::new();
        session.set_layout(LayoutPass::empty());
        let ticket = session.begin_search();
        session.complete_search(ticket, vec![summary(1, "A")]);
        assert!(session.layout().is_none());
    }

    #[test]
    fn test_add_is_unique_by_id() {
        let mut session = Session::new();
        let movie = summary(10, "Heat");

        let pending = session.begin_add(&movie).unwrap();
        assert!(session.is_pending(10));
        assert_eq!(session.begin_add(&movie).unwrap_err(), AddRejected::Pending);

        let entry = session.complete_add(pending, 170);
        assert_eq!(entry.runtime_minutes, 170);
        assert!(!session.is_pending(10));
        assert_eq!(session.begin_add(&movie).unwrap_err(), AddRejected::AlreadyListed);
        assert_eq!(session.watchlist().len(), 1);
    }

    #[test]
    fn test_abandon_releases_reservation() {
        let mut session = Session::new();
        let movie = summary(3, "Alien");
        let pending = session.begin_add(&movie).unwrap();
        session.abandon_add(pending);
        assert!(!session.is_pending(3));
        assert!(session.begin_add(&movie).is_ok());
    }

    #[test]
    fn test_remove_and_totals() {
        let mut session = Session::new();
        for (id, minutes) in [(1, 1000), (2, 500), (3, 30)] {
            let pending = session.begin_add(&summary(id, "x")).unwrap();
            session.complete_add(pending, minutes);
        }
        assert_eq!(session.total_minutes(), 1530);

        let removed = session.remove(3).unwrap();
        assert_eq!(removed.id, 3);
        assert!(session.remove(3).is_none());
        assert_eq!(session.total_breakdown(), RuntimeBreakdown { days: 1, hours: 1, minutes: 0 });
    }

    #[test]
    fn test_select_and_toggle() {
        let mut session = Session::new();
        let ticket = session.begin_search();
        session.complete_search(ticket, vec![summary(1, "A"), summary(2, "B")]);

        assert_eq!(session.select(2).map(|s| s.title.as_str()), Some("B"));
        assert!(session.select(99).is_none());
        session.select(1);
        session.clear_selection();
        assert!(session.selected().is_none());

        assert!(!session.is_watchlist_open());
        assert!(session.toggle_watchlist_panel());
        assert!(!session.toggle_watchlist_panel());
    }
}
