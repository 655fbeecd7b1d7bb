use crate::layout::{LayoutEngine, Viewport};
use crate::session::{AddRejected, Session};
use rand::rngs::StdRng;
use rand::SeedableRng;
use reelwall_models::{MediaKind, MediaSummary, WatchListEntry};
use reelwall_sources::MetadataSource;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Results replaced the display and were laid out
    Applied { results: usize, placed: usize },
    /// A newer search was issued while this one was in flight
    Stale,
    /// The source failed; the previous results stay on screen
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    Added(WatchListEntry),
    Rejected(AddRejected),
    NotInResults,
}

struct State {
    session: Session,
    viewport: Viewport,
    rng: StdRng,
}

/// Drives a [`Session`] from user actions. Network calls happen with the
/// state unlocked, so a slow lookup never blocks other actions.
pub struct Controller {
    source: Arc<dyn MetadataSource>,
    engine: LayoutEngine,
    state: Mutex<State>,
}

impl Controller {
    pub fn new(source: Arc<dyn MetadataSource>, engine: LayoutEngine, viewport: Viewport) -> Self {
        Self::with_rng(source, engine, viewport, StdRng::from_os_rng())
    }

    /// Deterministic layouts, for tests and reproducible screenshots
    pub fn with_seed(source: Arc<dyn MetadataSource>, engine: LayoutEngine, viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(source, engine, viewport, StdRng::seed_from_u64(seed))
    }

    fn with_rng(source: Arc<dyn MetadataSource>, engine: LayoutEngine, viewport: Viewport, rng: StdRng) -> Self {
        Self {
            source,
            engine,
            state: Mutex::new(State {
                session: Session::new(),
                viewport,
                rng,
            }),
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.source_name()
    }

    /// Read the session under the lock
    pub async fn with_session<T>(&self, f: impl FnOnce(&Session) -> T) -> T {
        let state = self.state.lock().await;
        f(&state.session)
    }

    fn relayout(engine: &LayoutEngine, state: &mut State) -> usize {
        let State { session, viewport, rng } = state;
        let pass = engine.place(0..session.results().len(), viewport, rng);
        let placed = pass.placed_count();
        session.set_layout(pass);
        placed
    }

    pub async fn search(&self, query: &str) -> SearchOutcome {
        let ticket = self.state.lock().await.session.begin_search();
        debug!(query = %query, ticket = ticket.sequence(), "Search started");

        let results = match self.source.search(query).await {
            Ok(results) => results,
            Err(e) => {
                error!(operation = "search", query = %query, error = %e, "Error fetching results");
                return SearchOutcome::Failed;
            }
        };

        let mut state = self.state.lock().await;
        let count = results.len();
        if !state.session.complete_search(ticket, results) {
            return SearchOutcome::Stale;
        }
        let placed = Self::relayout(&self.engine, &mut state);
        info!(query = %query, results = count, placed, "Search results displayed");
        SearchOutcome::Applied { results: count, placed }
    }

    /// Change the viewport and lay the current results out again
    pub async fn resize(&self, viewport: Viewport) -> usize {
        let mut state = self.state.lock().await;
        state.viewport = viewport;
        Self::relayout(&self.engine, &mut state)
    }

    /// Runtime in minutes, or 0 when the lookup fails
    pub async fn runtime_or_zero(&self, id: u64, kind: MediaKind) -> u64 {
        match self.source.lookup_runtime(id, kind).await {
            Ok(minutes) => minutes,
            Err(e) => {
                error!(operation = "runtime_lookup", id, media_type = %kind, error = %e, "Error fetching runtime data");
                0
            }
        }
    }

    pub async fn add(&self, summary: &MediaSummary) -> AddOutcome {
        let pending = match self.state.lock().await.session.begin_add(summary) {
            Ok(pending) => pending,
            Err(rejected) => {
                debug!(id = summary.id, reason = %rejected, "Add ignored");
                return AddOutcome::Rejected(rejected);
            }
        };

        let minutes = self.runtime_or_zero(summary.id, summary.media_type).await;

        let mut state = self.state.lock().await;
        let entry = state.session.complete_add(pending, minutes).clone();
        info!(id = entry.id, title = %entry.title, runtime_minutes = minutes, "Added to watch-list");
        AddOutcome::Added(entry)
    }

    /// Add a displayed result by id
    pub async fn add_by_id(&self, id: u64) -> AddOutcome {
        let summary = self
            .with_session(|s| s.results().iter().find(|r| r.id == id).cloned())
            .await;
        match summary {
            Some(summary) => self.add(&summary).await,
            None => {
                warn!(id, "Add requested for an id that is not displayed");
                AddOutcome::NotInResults
            }
        }
    }

    pub async fn remove(&self, id: u64) -> Option<WatchListEntry> {
        self.state.lock().await.session.remove(id)
    }

    pub async fn select(&self, id: u64) -> Option<MediaSummary> {
        self.state.lock().await.session.select(id).cloned()
    }

    pub async fn clear_selection(&self) {
        self.state.lock().await.session.clear_selection();
    }

    pub async fn toggle_watchlist_panel(&self) -> bool {
        self.state.lock().await.session.toggle_watchlist_panel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Rect;
    use async_trait::async_trait;
    use reelwall_sources::SourceError;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn summary(id: u64, title: &str, kind: MediaKind) -> MediaSummary {
        MediaSummary {
            id,
            poster_url: String::new(),
            title: title.to_string(),
            overview: String::new(),
            release_date: "2021".to_string(),
            media_type: kind,
        }
    }

    /// Scripted source: `gates` holds searches for a query until notified
    #[derive(Default)]
    struct FakeSource {
        runtimes: HashMap<u64, u64>,
        gates: HashMap<String, Arc<Notify>>,
        runtime_gate: Option<Arc<Notify>>,
        failing_queries: Vec<String>,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl MetadataSource for FakeSource {
        fn source_name(&self) -> &str {
            "fake"
        }

        async fn search(&self, query: &str) -> Result<Vec<MediaSummary>, SourceError> {
            if let Some(gate) = self.gates.get(query) {
                gate.notified().await;
            }
            if self.failing_queries.iter().any(|q| q == query) {
                return Err(SourceError::Shape("results is not an array".to_string()));
            }
            Ok((1..=3).map(|i| summary(i, &format!("{} {}", query, i), MediaKind::Movie)).collect())
        }

        async fn lookup_runtime(&self, id: u64, _kind: MediaKind) -> Result<u64, SourceError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.runtime_gate {
                gate.notified().await;
            }
            self.runtimes
                .get(&id)
                .copied()
                .ok_or_else(|| SourceError::Status { status: 404, reason: "Not Found".to_string() })
        }
    }

    fn controller(source: FakeSource) -> (Arc<Controller>, Arc<FakeSource>) {
        let source = Arc::new(source);
        let controller = Controller::with_seed(source.clone(), LayoutEngine::default(), Viewport::default(), 5);
        (Arc::new(controller), source)
    }

    #[tokio::test]
    async fn test_search_lays_out_results() {
        let (controller, _) = controller(FakeSource::default());
        let outcome = controller.search("alien").await;
        assert!(matches!(outcome, SearchOutcome::Applied { results: 3, .. }));

        let (titles, laid_out) = controller
            .with_session(|s| {
                let titles: Vec<String> = s.results().iter().map(|r| r.title.clone()).collect();
                (titles, s.layout().map(|l| l.len()))
            })
            .await;
        assert_eq!(titles[0], "alien 1");
        assert_eq!(laid_out, Some(3));
    }

    #[tokio::test]
    async fn test_slow_older_search_loses() {
        let gate = Arc::new(Notify::new());
        let mut fake = FakeSource::default();
        fake.gates.insert("al".to_string(), gate.clone());
        let (controller, _) = controller(fake);

        let slow = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.search("al").await })
        };
        // The slow search must hold its ticket before the newer one starts
        while controller.with_session(|s| s.search_sequence()).await == 0 {
            tokio::task::yield_now().await;
        }

        let fast = controller.search("alien").await;
        assert!(matches!(fast, SearchOutcome::Applied { .. }));

        gate.notify_one();
        assert_eq!(slow.await.unwrap(), SearchOutcome::Stale);

        let first = controller.with_session(|s| s.results()[0].title.clone()).await;
        assert_eq!(first, "alien 1");
    }

    #[tokio::test]
    async fn test_failed_search_keeps_previous_results() {
        let fake = FakeSource {
            failing_queries: vec!["broken".to_string()],
            ..FakeSource::default()
        };
        let (controller, _) = controller(fake);
        controller.search("heat").await;

        assert_eq!(controller.search("broken").await, SearchOutcome::Failed);
        let first = controller.with_session(|s| s.results()[0].title.clone()).await;
        assert_eq!(first, "heat 1");
        assert!(controller.with_session(|s| s.layout().is_some()).await);
    }

    #[tokio::test]
    async fn test_add_computes_runtime_and_dedupes() {
        let mut fake = FakeSource::default();
        fake.runtimes.insert(1, 1500);
        let (controller, source) = controller(fake);
        controller.search("heat").await;

        let AddOutcome::Added(entry) = controller.add_by_id(1).await else {
            panic!("expected add");
        };
        assert_eq!(entry.runtime_minutes, 1500);
        assert_eq!(entry.runtime_breakdown.days, 1);
        assert_eq!(entry.runtime_breakdown.hours, 1);

        assert_eq!(controller.add_by_id(1).await, AddOutcome::Rejected(AddRejected::AlreadyListed));
        assert_eq!(controller.add_by_id(42).await, AddOutcome::NotInResults);
        assert_eq!(source.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_adds_with_zero_runtime() {
        let (controller, _) = controller(FakeSource::default());
        let AddOutcome::Added(entry) = controller.add(&summary(8, "Lost", MediaKind::Tv)).await else {
            panic!("expected add");
        };
        assert_eq!(entry.runtime_minutes, 0);
        assert_eq!(entry.runtime_label(), "Run time unavailable");
    }

    #[tokio::test]
    async fn test_double_click_while_pending_is_rejected() {
        let gate = Arc::new(Notify::new());
        let mut fake = FakeSource::default();
        fake.runtimes.insert(5, 90);
        fake.runtime_gate = Some(gate.clone());
        let (controller, source) = controller(fake);
        let movie = summary(5, "Up", MediaKind::Movie);

        let first = {
            let controller = controller.clone();
            let movie = movie.clone();
            tokio::spawn(async move { controller.add(&movie).await })
        };
        while !controller.with_session(|s| s.is_pending(5)).await {
            tokio::task::yield_now().await;
        }

        assert_eq!(controller.add(&movie).await, AddOutcome::Rejected(AddRejected::Pending));
        gate.notify_one();
        assert!(matches!(first.await.unwrap(), AddOutcome::Added(_)));
        assert_eq!(controller.with_session(|s| s.watchlist().len()).await, 1);
        assert_eq!(source.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_remove_select_resize() {
        let mut fake = FakeSource::default();
        fake.runtimes.insert(2, 100);
        let (controller, _) = controller(fake);
        controller.search("dune").await;
        controller.add_by_id(2).await;

        assert_eq!(controller.select(3).await.map(|s| s.title), Some("dune 3".to_string()));
        assert!(controller.toggle_watchlist_panel().await);
        assert_eq!(controller.remove(2).await.map(|e| e.id), Some(2));
        assert!(controller.remove(2).await.is_none());

        // Too small for any poster
        let placed = controller
            .resize(Viewport::new(Rect::new(0.0, 0.0, 50.0, 50.0), Rect::new(0.0, 0.0, 0.0, 0.0)))
            .await;
        assert_eq!(placed, 0);
    }
}
