use rand::Rng;
use reelwall_config::LayoutConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Interiors intersect; rectangles that only share an edge do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }

    /// Closed-interval test: sharing an edge counts as touching
    pub fn touches(&self, other: &Rect) -> bool {
        !(self.right() < other.left
            || self.left > other.right()
            || self.bottom() < other.top
            || self.top > other.bottom())
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn inset(&self, amount: f64) -> Rect {
        Rect::new(
            self.left + amount,
            self.top + amount,
            self.width - 2.0 * amount,
            self.height - 2.0 * amount,
        )
    }

    /// Offset into `container`'s coordinate space, for absolutely positioned rendering
    pub fn relative_to(&self, container: &Rect) -> Rect {
        Rect::new(self.left - container.left, self.top - container.top, self.width, self.height)
    }
}

/// The area posters are scattered over and the region they must keep clear of
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub container: Rect,
    pub excluded: Rect,
}

impl Viewport {
    pub fn new(container: Rect, excluded: Rect) -> Self {
        Self { container, excluded }
    }

    /// A `width`x`height` screen with the search box as a band centered
    /// horizontally near the top, 60% of the width.
    pub fn with_search_band(width: f64, height: f64) -> Self {
        let container = Rect::new(0.0, 0.0, width, height);
        let excluded = Rect::new(width * 0.2, 40.0, width * 0.6, 72.0);
        Self { container, excluded }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::with_search_band(1280.0, 800.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placement<K> {
    pub item: K,
    /// `None` when every attempt was rejected
    pub rect: Option<Rect>,
}

/// Outcome of one layout pass, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPass<K> {
    pub placements: Vec<Placement<K>>,
}

impl<K> LayoutPass<K> {
    pub fn empty() -> Self {
        Self { placements: Vec::new() }
    }

    pub fn placed(&self) -> impl Iterator<Item = (&K, &Rect)> {
        self.placements
            .iter()
            .filter_map(|p| p.rect.as_ref().map(|rect| (&p.item, rect)))
    }

    pub fn unplaced(&self) -> impl Iterator<Item = &K> {
        self.placements.iter().filter(|p| p.rect.is_none()).map(|p| &p.item)
    }

    pub fn placed_count(&self) -> usize {
        self.placed().count()
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

impl<K: PartialEq> LayoutPass<K> {
    pub fn rect_for(&self, item: &K) -> Option<&Rect> {
        self.placements
            .iter()
            .find(|p| &p.item == item)
            .and_then(|p| p.rect.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEngine {
    min_size: u32,
    max_size: u32,
    aspect_ratio: f64,
    margin: f64,
    max_attempts: u32,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

/// Uniform integer in `[min, max]`, or `None` when the range is empty
fn draw_coordinate<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64) -> Option<f64> {
    let lo = min.ceil();
    let hi = max.floor();
    if !(lo.is_finite() && hi.is_finite()) || lo > hi {
        return None;
    }
    Some(rng.random_range(lo as i64..=hi as i64) as f64)
}

impl LayoutEngine {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            min_size: config.min_size.min(config.max_size),
            max_size: config.max_size.max(config.min_size),
            aspect_ratio: config.aspect_ratio,
            margin: f64::from(config.margin),
            max_attempts: config.max_attempts,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Run one layout pass. Each item gets a random width and up to
    /// `max_attempts` random positions; a position touching an earlier poster
    /// or overlapping the excluded region is rejected. No backtracking, so
    /// input order matters and items that run out of attempts stay unplaced.
    pub fn place<K, I, R>(&self, items: I, viewport: &Viewport, rng: &mut R) -> LayoutPass<K>
    where
        I: IntoIterator<Item = K>,
        R: Rng + ?Sized,
    {
        let container = &viewport.container;
        let excluded = &viewport.excluded;
        let mut committed: Vec<Rect> = Vec::new();
        let mut placements = Vec::new();

        for (index, item) in items.into_iter().enumerate() {
            let width = f64::from(rng.random_range(self.min_size..=self.max_size));
            let height = width * self.aspect_ratio;

            let mut rect = None;
            for _ in 0..self.max_attempts {
                let Some(left) = draw_coordinate(
                    rng,
                    container.left + self.margin,
                    container.right() - width - self.margin,
                ) else {
                    continue;
                };
                let Some(top) = draw_coordinate(
                    rng,
                    container.top + self.margin,
                    container.bottom() - height - self.margin,
                ) else {
                    continue;
                };

                let candidate = Rect::new(left, top, width, height);
                if candidate.overlaps(excluded) || committed.iter().any(|r| r.touches(&candidate)) {
                    continue;
                }

                committed.push(candidate);
                rect = Some(candidate);
                break;
            }

            if rect.is_none() {
                warn!(
                    index,
                    width,
                    attempts = self.max_attempts,
                    "Failed to place item without overlap"
                );
            }
            placements.push(Placement { item, rect });
        }

        debug!(
            placed = committed.len(),
            total = placements.len(),
            "Layout pass complete"
        );
        LayoutPass { placements }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_valid(pass: &LayoutPass<usize>, viewport: &Viewport, margin: f64) {
        let placed: Vec<&Rect> = pass.placed().map(|(_, r)| r).collect();
        let bounds = viewport.container.inset(margin);
        for (i, a) in placed.iter().enumerate() {
            assert!(bounds.contains(a), "{:?} escapes {:?}", a, bounds);
            assert!(!a.overlaps(&viewport.excluded), "{:?} covers the excluded region", a);
            for b in &placed[i + 1..] {
                assert!(!a.touches(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_rect_overlap_rules() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let edge = Rect::new(10.0, 0.0, 10.0, 10.0);
        let apart = Rect::new(11.0, 0.0, 10.0, 10.0);
        let inside = Rect::new(2.0, 2.0, 2.0, 2.0);

        assert!(!a.overlaps(&edge));
        assert!(a.touches(&edge));
        assert!(!a.touches(&apart));
        assert!(a.overlaps(&inside) && a.touches(&inside));
        assert!(a.contains(&inside));
    }

    #[test]
    fn test_relative_to_container() {
        let container = Rect::new(80.0, 160.0, 1000.0, 600.0);
        let r = Rect::new(100.0, 200.0, 120.0, 180.0).relative_to(&container);
        assert_eq!(r, Rect::new(20.0, 40.0, 120.0, 180.0));
    }

    #[test]
    fn test_placements_are_disjoint_and_bounded() {
        let engine = LayoutEngine::default();
        let viewport = Viewport::default();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pass = engine.place(0..30, &viewport, &mut rng);
            assert_eq!(pass.len(), 30);
            assert!(pass.placed_count() > 0);
            assert_valid(&pass, &viewport, engine.margin());
        }
    }

    #[test]
    fn test_sizes_follow_poster_ratio() {
        let engine = LayoutEngine::default();
        let viewport = Viewport::with_search_band(4000.0, 4000.0);
        let mut rng = StdRng::seed_from_u64(7);
        let pass = engine.place(0..10, &viewport, &mut rng);
        for (_, rect) in pass.placed() {
            assert!(rect.width >= 100.0 && rect.width <= 200.0);
            assert_eq!(rect.height, rect.width * 1.5);
            assert_eq!(rect.left.fract(), 0.0);
        }
    }

    #[test]
    fn test_container_too_small_never_places() {
        let engine = LayoutEngine::default();
        // 100 + 2 * 10 margin does not fit in 110
        let viewport = Viewport::new(Rect::new(0.0, 0.0, 110.0, 1000.0), Rect::new(0.0, 0.0, 0.0, 0.0));
        let mut rng = StdRng::seed_from_u64(1);
        let pass = engine.place(vec!["a", "b"], &viewport, &mut rng);
        assert_eq!(pass.placed_count(), 0);
        assert_eq!(pass.unplaced().copied().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_excluded_region_covering_everything() {
        let engine = LayoutEngine::default();
        let container = Rect::new(0.0, 0.0, 600.0, 600.0);
        let viewport = Viewport::new(container, container);
        let mut rng = StdRng::seed_from_u64(3);
        let pass = engine.place(0..3, &viewport, &mut rng);
        assert_eq!(pass.placed_count(), 0);
    }

    #[test]
    fn test_crowded_container_leaves_later_items_unplaced() {
        let engine = LayoutEngine::from_config(&LayoutConfig {
            min_size: 100,
            max_size: 100,
            ..LayoutConfig::default()
        });
        // Room for exactly one 100x150 poster
        let viewport = Viewport::new(Rect::new(0.0, 0.0, 120.0, 170.0), Rect::new(-10.0, -10.0, 1.0, 1.0));
        let mut rng = StdRng::seed_from_u64(11);
        let pass = engine.place(0..3, &viewport, &mut rng);
        assert_eq!(pass.rect_for(&0), Some(&Rect::new(10.0, 10.0, 100.0, 150.0)));
        assert_eq!(pass.unplaced().count(), 2);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let engine = LayoutEngine::default();
        let viewport = Viewport::default();
        let a = engine.place(0..15, &viewport, &mut StdRng::seed_from_u64(42));
        let b = engine.place(0..15, &viewport, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
