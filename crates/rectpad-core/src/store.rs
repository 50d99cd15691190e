//! In-memory rectangle store.

use crate::shapes::{RectId, Rectangle, StrokeColor};
use kurbo::Point;
use std::collections::HashMap;

/// Why the consistency sweep dropped a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Both width and height are below the minimum size.
    Undersized,
    /// No color was assigned. Takes precedence over `Undersized`.
    MissingColor,
}

/// A rectangle removed by [`RectStore::sweep`].
#[derive(Debug, Clone, PartialEq)]
pub struct Discarded {
    pub id: RectId,
    pub reason: DiscardReason,
}

/// Result of a consistency sweep: the filtered store plus what was dropped.
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    pub kept: RectStore,
    /// Dropped rectangles in ascending id order.
    pub discarded: Vec<Discarded>,
}

/// Mapping from identifier to rectangle.
///
/// The store owns the identifier counter, so ids are never reused even
/// after rectangles are removed.
#[derive(Debug, Clone, Default)]
pub struct RectStore {
    rects: HashMap<RectId, Rectangle>,
    last_id: u64,
}

impl RectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next identifier.
    pub fn allocate_id(&mut self) -> RectId {
        self.last_id += 1;
        RectId::new(self.last_id)
    }

    /// Allocate an id and insert a zero-sized rectangle anchored at `anchor`.
    pub fn create(&mut self, anchor: Point, stroke: Option<StrokeColor>) -> RectId {
        let id = self.allocate_id();
        self.rects.insert(id, Rectangle::anchored(id, anchor, stroke));
        id
    }

    pub fn get(&self, id: RectId) -> Option<&Rectangle> {
        self.rects.get(&id)
    }

    pub fn get_mut(&mut self, id: RectId) -> Option<&mut Rectangle> {
        self.rects.get_mut(&id)
    }

    pub fn contains(&self, id: RectId) -> bool {
        self.rects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Iterate rectangles in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Rectangle> {
        self.rects.values()
    }

    /// Rectangles in ascending id order (oldest first, i.e. back to front).
    pub fn ordered(&self) -> Vec<&Rectangle> {
        let mut rects: Vec<_> = self.rects.values().collect();
        rects.sort_by_key(|r| r.id);
        rects
    }

    /// Whether any rectangle carries exactly this stroke (including `None`).
    pub fn uses_stroke(&self, stroke: Option<StrokeColor>) -> bool {
        self.rects.values().any(|r| r.stroke == stroke)
    }

    /// Find the rectangle tagged with `color`. With duplicates, the newest wins.
    pub fn find_by_stroke(&self, color: StrokeColor) -> Option<RectId> {
        self.ordered()
            .into_iter()
            .filter(|r| r.stroke == Some(color))
            .last()
            .map(|r| r.id)
    }

    /// Topmost rectangle containing the point.
    pub fn rect_at(&self, point: Point, tolerance: f64) -> Option<RectId> {
        self.ordered()
            .into_iter()
            .rev()
            .find(|r| r.hit_test(point, tolerance))
            .map(|r| r.id)
    }

    /// Consistency sweep over every entry.
    ///
    /// Drops rectangles that are undersized in both dimensions or have no
    /// color. Returns a new store and leaves `self` untouched.
    pub fn sweep(&self) -> SweepOutcome {
        let mut discarded = Vec::new();
        let rects: HashMap<RectId, Rectangle> = self
            .rects
            .iter()
            .filter(|(id, rect)| {
                let reason = if rect.is_colorless() {
                    Some(DiscardReason::MissingColor)
                } else if rect.is_undersized() {
                    Some(DiscardReason::Undersized)
                } else {
                    None
                };
                match reason {
                    Some(reason) => {
                        discarded.push(Discarded { id: **id, reason });
                        false
                    }
                    None => true,
                }
            })
            .map(|(id, rect)| (*id, rect.clone()))
            .collect();
        discarded.sort_by_key(|d| d.id);

        SweepOutcome {
            kept: RectStore {
                rects,
                last_id: self.last_id,
            },
            discarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: StrokeColor = StrokeColor::rgb(239, 68, 68);
    const BLUE: StrokeColor = StrokeColor::rgb(59, 130, 246);

    fn sized(store: &mut RectStore, x: f64, y: f64, w: f64, h: f64, stroke: Option<StrokeColor>) -> RectId {
        let id = store.create(Point::new(x, y), stroke);
        let rect = store.get_mut(id).unwrap();
        rect.width = w;
        rect.height = h;
        id
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut store = RectStore::new();
        let a = store.create(Point::ZERO, Some(RED));
        let b = sized(&mut store, 0.0, 0.0, 1.0, 1.0, Some(BLUE));
        store = store.sweep().kept;
        assert!(!store.contains(b));
        let c = store.create(Point::ZERO, None);
        assert_eq!(a.to_string(), "1");
        assert_eq!(b.to_string(), "2");
        assert_eq!(c.to_string(), "3");
    }

    #[test]
    fn test_sweep_is_pure() {
        let mut store = RectStore::new();
        let keep = sized(&mut store, 0.0, 0.0, 50.0, 40.0, Some(RED));
        let tiny = sized(&mut store, 0.0, 0.0, 3.0, 2.0, Some(BLUE));
        let blank = sized(&mut store, 0.0, 0.0, 50.0, 50.0, None);

        let outcome = store.sweep();
        assert_eq!(store.len(), 3);
        assert_eq!(outcome.kept.len(), 1);
        assert!(outcome.kept.contains(keep));
        assert_eq!(
            outcome.discarded,
            vec![
                Discarded { id: tiny, reason: DiscardReason::Undersized },
                Discarded { id: blank, reason: DiscardReason::MissingColor },
            ]
        );
    }

    #[test]
    fn test_sweep_keeps_thin_rectangles() {
        let mut store = RectStore::new();
        let thin = sized(&mut store, 0.0, 0.0, 80.0, 2.0, Some(RED));
        assert!(store.sweep().kept.contains(thin));
    }

    #[test]
    fn test_sweep_colorless_wins_over_undersized() {
        let mut store = RectStore::new();
        let id = sized(&mut store, 0.0, 0.0, 1.0, 1.0, None);
        let outcome = store.sweep();
        assert_eq!(outcome.discarded[0].id, id);
        assert_eq!(outcome.discarded[0].reason, DiscardReason::MissingColor);
    }

    #[test]
    fn test_sweep_preserves_counter() {
        let mut store = RectStore::new();
        sized(&mut store, 0.0, 0.0, 1.0, 1.0, Some(RED));
        let mut kept = store.sweep().kept;
        assert!(kept.is_empty());
        assert_eq!(kept.allocate_id(), RectId::new(2));
    }

    #[test]
    fn test_find_by_stroke_newest_wins() {
        let mut store = RectStore::new();
        sized(&mut store, 0.0, 0.0, 10.0, 10.0, Some(RED));
        let newer = sized(&mut store, 20.0, 20.0, 10.0, 10.0, Some(RED));
        sized(&mut store, 40.0, 40.0, 10.0, 10.0, Some(BLUE));
        assert_eq!(store.find_by_stroke(RED), Some(newer));
        assert_eq!(store.find_by_stroke(StrokeColor::rgb(0, 0, 0)), None);
    }

    #[test]
    fn test_uses_stroke() {
        let mut store = RectStore::new();
        assert!(!store.uses_stroke(Some(RED)));
        sized(&mut store, 0.0, 0.0, 10.0, 10.0, Some(RED));
        assert!(store.uses_stroke(Some(RED)));
        assert!(!store.uses_stroke(Some(BLUE)));
        assert!(!store.uses_stroke(None));
    }

    #[test]
    fn test_rect_at_prefers_topmost() {
        let mut store = RectStore::new();
        let back = sized(&mut store, 0.0, 0.0, 100.0, 100.0, Some(RED));
        let front = sized(&mut store, 50.0, 50.0, 100.0, 100.0, Some(BLUE));
        assert_eq!(store.rect_at(Point::new(75.0, 75.0), 0.0), Some(front));
        assert_eq!(store.rect_at(Point::new(25.0, 25.0), 0.0), Some(back));
        assert_eq!(store.rect_at(Point::new(400.0, 400.0), 0.0), None);
    }
}
