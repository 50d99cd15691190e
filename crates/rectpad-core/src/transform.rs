//! Transform handle session.
//!
//! While a handle is dragged the rectangle keeps its stored width and
//! height; the resize is expressed as a node position plus a scale factor.
//! At transform-end the scale is folded back into the stored geometry (see
//! `CanvasSurface::commit_transform`), so stored sizes are always unscaled
//! and repeated resizes never compound.

use crate::selection::{HandleKind, bound_box};
use crate::shapes::RectId;
use kurbo::{Point, Rect, Vec2};

/// Final node state handed back at transform-end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformEnd {
    pub id: RectId,
    pub position: Point,
    pub scale: Vec2,
}

/// An in-flight resize of one rectangle through one handle.
#[derive(Debug, Clone)]
pub struct Transformer {
    id: RectId,
    handle: HandleKind,
    /// Stored geometry at the start of the session (scale 1).
    base: Rect,
    /// Last box accepted by the bound-box constraint.
    current: Rect,
    /// Offset from the pointer to the handle at press time.
    grab: Vec2,
}

impl Transformer {
    /// Start a session for `id` whose stored geometry is `base`.
    pub fn begin(id: RectId, handle: HandleKind, base: Rect, pointer: Point) -> Self {
        Self {
            id,
            handle,
            base,
            current: base,
            grab: handle.anchor(base) - pointer,
        }
    }

    pub fn id(&self) -> RectId {
        self.id
    }

    pub fn handle(&self) -> HandleKind {
        self.handle
    }

    /// Feed a pointer position. Returns false when the constraint rejected it.
    pub fn update(&mut self, pointer: Point) -> bool {
        let candidate = self.handle.drag_box(self.current, pointer + self.grab);
        let next = bound_box(self.current, candidate);
        self.current = next;
        next == candidate
    }

    /// Current box in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        self.current
    }

    /// Node position (top-left of the current box).
    pub fn position(&self) -> Point {
        Point::new(self.current.x0, self.current.y0)
    }

    /// Scale of the current box relative to the stored size.
    pub fn scale(&self) -> Vec2 {
        let ratio = |now: f64, before: f64| if before > 0.0 { now / before } else { 1.0 };
        Vec2::new(
            ratio(self.current.width(), self.base.width()),
            ratio(self.current.height(), self.base.height()),
        )
    }

    pub fn finish(self) -> TransformEnd {
        TransformEnd {
            id: self.id,
            position: self.position(),
            scale: self.scale(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{Corner, Edge};

    fn base() -> Rect {
        Rect::new(100.0, 100.0, 150.0, 140.0)
    }

    #[test]
    fn test_corner_resize_scales() {
        let mut t = Transformer::begin(
            RectId::new(1),
            HandleKind::Corner(Corner::BottomRight),
            base(),
            Point::new(150.0, 140.0),
        );
        assert!(t.update(Point::new(200.0, 180.0)));
        let end = t.finish();
        assert_eq!(end.position, Point::new(100.0, 100.0));
        assert_eq!(end.scale, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_top_left_resize_moves_position() {
        let mut t = Transformer::begin(
            RectId::new(1),
            HandleKind::Corner(Corner::TopLeft),
            base(),
            Point::new(100.0, 100.0),
        );
        assert!(t.update(Point::new(125.0, 120.0)));
        assert_eq!(t.position(), Point::new(125.0, 120.0));
        assert_eq!(t.scale(), Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_grab_offset_prevents_jump() {
        let mut t = Transformer::begin(
            RectId::new(1),
            HandleKind::Edge(Edge::Right),
            base(),
            Point::new(153.0, 118.0),
        );
        assert!(t.update(Point::new(153.0, 118.0)));
        assert_eq!(t.bounds(), base());
    }

    #[test]
    fn test_rejected_resize_keeps_last_box() {
        let mut t = Transformer::begin(
            RectId::new(1),
            HandleKind::Corner(Corner::BottomRight),
            base(),
            Point::new(150.0, 140.0),
        );
        assert!(t.update(Point::new(160.0, 150.0)));
        assert!(!t.update(Point::new(102.0, 102.0)));
        assert_eq!(t.bounds(), Rect::new(100.0, 100.0, 160.0, 150.0));
        // Crossing the opposite edge is rejected too.
        assert!(!t.update(Point::new(50.0, 150.0)));
        assert_eq!(t.bounds(), Rect::new(100.0, 100.0, 160.0, 150.0));
    }

    #[test]
    fn test_edge_resize_keeps_other_axis() {
        let mut t = Transformer::begin(
            RectId::new(1),
            HandleKind::Edge(Edge::Bottom),
            base(),
            Point::new(125.0, 140.0),
        );
        assert!(t.update(Point::new(300.0, 180.0)));
        assert_eq!(t.scale(), Vec2::new(1.0, 2.0));
    }
}
