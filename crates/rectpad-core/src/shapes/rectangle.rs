//! Rectangle shape.

use super::{RectId, StrokeColor};
use kurbo::{Point, Rect, Vec2};

/// An axis-aligned rectangle tied to a stroke color.
///
/// While a rectangle is being drawn its width and height are the signed
/// distance from the anchor to the pointer and may be negative. Stored
/// rectangles are normalized and at least [`Rectangle::MIN_SIZE`] wide and high.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub(crate) id: RectId,
    /// Top-left corner position (the anchor while drawing).
    pub position: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
    /// Associated color; `None` when drawn without an active color.
    pub stroke: Option<StrokeColor>,
}

impl Rectangle {
    /// Smallest width/height a committed rectangle may have.
    pub const MIN_SIZE: f64 = 5.0;

    /// Stroke width used when rendering.
    pub const STROKE_WIDTH: f64 = 2.0;

    /// Create a rectangle with explicit geometry.
    pub fn new(id: RectId, position: Point, width: f64, height: f64, stroke: Option<StrokeColor>) -> Self {
        Self {
            id,
            position,
            width,
            height,
            stroke,
        }
    }

    /// Create a zero-sized rectangle anchored at a point.
    pub fn anchored(id: RectId, anchor: Point, stroke: Option<StrokeColor>) -> Self {
        Self::new(id, anchor, 0.0, 0.0, stroke)
    }

    pub fn id(&self) -> RectId {
        self.id
    }

    /// Get the rectangle as a normalized kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::from_points(
            self.position,
            Point::new(self.position.x + self.width, self.position.y + self.height),
        )
    }

    /// Geometry of this rectangle rendered at another position and scale.
    pub fn scaled_rect(&self, position: Point, scale: Vec2) -> Rect {
        Rect::from_points(
            position,
            Point::new(
                position.x + self.width * scale.x,
                position.y + self.height * scale.y,
            ),
        )
    }

    /// Check whether a point lies inside the rectangle (inflated by `tolerance`).
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.as_rect().inflate(tolerance, tolerance).contains(point)
    }

    /// Flip negative width/height so the position is the real top-left.
    pub fn normalize(&mut self) {
        if self.width < 0.0 {
            self.position.x += self.width;
            self.width = -self.width;
        }
        if self.height < 0.0 {
            self.position.y += self.height;
            self.height = -self.height;
        }
    }

    /// Both dimensions are below the minimum size.
    pub fn is_undersized(&self) -> bool {
        self.width.abs() < Self::MIN_SIZE && self.height.abs() < Self::MIN_SIZE
    }

    pub fn is_colorless(&self) -> bool {
        self.stroke.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rectangle {
        Rectangle::new(RectId::new(1), Point::new(x, y), w, h, Some(StrokeColor::rgb(255, 0, 0)))
    }

    #[test]
    fn test_as_rect_normalizes_negative_size() {
        let r = rect(150.0, 140.0, -50.0, -40.0);
        let bounds = r.as_rect();
        assert!((bounds.x0 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.width() - 50.0).abs() < f64::EPSILON);
        assert!((bounds.height() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_normalize() {
        let mut r = rect(150.0, 140.0, -50.0, 40.0);
        r.normalize();
        assert_eq!(r.position, Point::new(100.0, 140.0));
        assert!((r.width - 50.0).abs() < f64::EPSILON);
        assert!((r.height - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_undersized_needs_both_dimensions() {
        assert!(rect(0.0, 0.0, 4.0, -4.0).is_undersized());
        assert!(!rect(0.0, 0.0, 4.0, 30.0).is_undersized());
        assert!(!rect(0.0, 0.0, 5.0, 4.0).is_undersized());
    }

    #[test]
    fn test_hit_test() {
        let r = rect(0.0, 0.0, 100.0, 100.0);
        assert!(r.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!r.hit_test(Point::new(150.0, 50.0), 0.0));
        assert!(r.hit_test(Point::new(105.0, 50.0), 10.0));
    }

    #[test]
    fn test_scaled_rect() {
        let r = rect(10.0, 20.0, 50.0, 40.0);
        let scaled = r.scaled_rect(Point::new(0.0, 0.0), Vec2::new(2.0, 0.5));
        assert!((scaled.width() - 100.0).abs() < f64::EPSILON);
        assert!((scaled.height() - 20.0).abs() < f64::EPSILON);
    }
}
