//! Selection state and the transform handles of the selected rectangle.

use crate::shapes::{RectId, Rectangle};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;

/// The single active selection, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection(Option<RectId>);

impl Selection {
    pub fn get(self) -> Option<RectId> {
        self.0
    }

    pub fn select(&mut self, id: RectId) {
        self.0 = Some(id);
    }

    pub fn set(&mut self, id: Option<RectId>) {
        self.0 = id;
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    pub fn is_selected(self, id: RectId) -> bool {
        self.0 == Some(id)
    }

    pub fn is_empty(self) -> bool {
        self.0.is_none()
    }
}

/// Type of transform handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle, resizes two edges.
    Corner(Corner),
    /// Edge midpoint handle, resizes one edge.
    Edge(Edge),
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl HandleKind {
    /// Where this handle sits on `bounds`.
    pub fn anchor(self, bounds: Rect) -> Point {
        let center = bounds.center();
        match self {
            HandleKind::Corner(Corner::TopLeft) => Point::new(bounds.x0, bounds.y0),
            HandleKind::Corner(Corner::TopRight) => Point::new(bounds.x1, bounds.y0),
            HandleKind::Corner(Corner::BottomLeft) => Point::new(bounds.x0, bounds.y1),
            HandleKind::Corner(Corner::BottomRight) => Point::new(bounds.x1, bounds.y1),
            HandleKind::Edge(Edge::Top) => Point::new(center.x, bounds.y0),
            HandleKind::Edge(Edge::Right) => Point::new(bounds.x1, center.y),
            HandleKind::Edge(Edge::Bottom) => Point::new(center.x, bounds.y1),
            HandleKind::Edge(Edge::Left) => Point::new(bounds.x0, center.y),
        }
    }

    /// Move the edges this handle controls so that the handle lands on `target`.
    pub fn drag_box(self, bounds: Rect, target: Point) -> Rect {
        let Rect { x0, y0, x1, y1 } = bounds;
        match self {
            HandleKind::Corner(Corner::TopLeft) => Rect::new(target.x, target.y, x1, y1),
            HandleKind::Corner(Corner::TopRight) => Rect::new(x0, target.y, target.x, y1),
            HandleKind::Corner(Corner::BottomLeft) => Rect::new(target.x, y0, x1, target.y),
            HandleKind::Corner(Corner::BottomRight) => Rect::new(x0, y0, target.x, target.y),
            HandleKind::Edge(Edge::Top) => Rect::new(x0, target.y, x1, y1),
            HandleKind::Edge(Edge::Right) => Rect::new(x0, y0, target.x, y1),
            HandleKind::Edge(Edge::Bottom) => Rect::new(x0, y0, x1, target.y),
            HandleKind::Edge(Edge::Left) => Rect::new(target.x, y0, x1, y1),
        }
    }
}

/// A transform handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point hits this handle.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }

    /// Square drawn for this handle.
    pub fn rect(&self, size: f64) -> Rect {
        Rect::from_center_size(self.position, (size, size))
    }
}

const HANDLE_KINDS: [HandleKind; 8] = [
    HandleKind::Corner(Corner::TopLeft),
    HandleKind::Corner(Corner::TopRight),
    HandleKind::Corner(Corner::BottomLeft),
    HandleKind::Corner(Corner::BottomRight),
    HandleKind::Edge(Edge::Top),
    HandleKind::Edge(Edge::Right),
    HandleKind::Edge(Edge::Bottom),
    HandleKind::Edge(Edge::Left),
];

/// Corner handles first, then edge midpoints.
pub fn get_handles(bounds: Rect) -> Vec<Handle> {
    HANDLE_KINDS
        .iter()
        .map(|&kind| Handle::new(kind.anchor(bounds), kind))
        .collect()
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(bounds: Rect, point: Point, tolerance: f64) -> Option<HandleKind> {
    get_handles(bounds)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

/// Resize constraint: a box narrower or shorter than the minimum size is
/// rejected and the previous box is kept.
pub fn bound_box(old: Rect, new: Rect) -> Rect {
    if new.width() < Rectangle::MIN_SIZE || new.height() < Rectangle::MIN_SIZE {
        old
    } else {
        new
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_single() {
        let mut selection = Selection::default();
        assert!(selection.is_empty());
        selection.select(RectId::new(1));
        selection.select(RectId::new(2));
        assert!(!selection.is_selected(RectId::new(1)));
        assert!(selection.is_selected(RectId::new(2)));
        selection.clear();
        assert_eq!(selection.get(), None);
    }

    #[test]
    fn test_handles_cover_corners_and_edges() {
        let bounds = Rect::new(100.0, 100.0, 150.0, 140.0);
        let handles = get_handles(bounds);
        assert_eq!(handles.len(), 8);
        assert_eq!(handles[3].position, Point::new(150.0, 140.0));
        assert_eq!(handles[3].kind, HandleKind::Corner(Corner::BottomRight));
        assert_eq!(handles[4].position, Point::new(125.0, 100.0));
    }

    #[test]
    fn test_hit_test_handles() {
        let bounds = Rect::new(100.0, 100.0, 150.0, 140.0);
        assert_eq!(
            hit_test_handles(bounds, Point::new(152.0, 141.0), HANDLE_HIT_TOLERANCE),
            Some(HandleKind::Corner(Corner::BottomRight))
        );
        assert_eq!(
            hit_test_handles(bounds, Point::new(100.0, 121.0), HANDLE_HIT_TOLERANCE),
            Some(HandleKind::Edge(Edge::Left))
        );
        assert_eq!(hit_test_handles(bounds, Point::new(125.0, 120.0), HANDLE_HIT_TOLERANCE), None);
    }

    #[test]
    fn test_drag_box_moves_controlled_edges_only() {
        let bounds = Rect::new(100.0, 100.0, 150.0, 140.0);
        let moved = HandleKind::Corner(Corner::TopLeft).drag_box(bounds, Point::new(90.0, 80.0));
        assert_eq!(moved, Rect::new(90.0, 80.0, 150.0, 140.0));
        let moved = HandleKind::Edge(Edge::Right).drag_box(bounds, Point::new(200.0, 999.0));
        assert_eq!(moved, Rect::new(100.0, 100.0, 200.0, 140.0));
    }

    #[test]
    fn test_bound_box_rejects_small_boxes() {
        let old = Rect::new(0.0, 0.0, 50.0, 40.0);
        assert_eq!(bound_box(old, Rect::new(0.0, 0.0, 4.0, 40.0)), old);
        assert_eq!(bound_box(old, Rect::new(0.0, 0.0, 50.0, 4.0)), old);
        // Dragging past the opposite edge gives a negative width.
        assert_eq!(bound_box(old, Rect::new(0.0, 0.0, -20.0, 40.0)), old);
        let ok = Rect::new(0.0, 0.0, 5.0, 5.0);
        assert_eq!(bound_box(old, ok), ok);
    }
}
