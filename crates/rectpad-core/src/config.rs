//! Canvas surface configuration.

use crate::selection::{HANDLE_HIT_TOLERANCE, HANDLE_SIZE};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Geometry and hit-testing settings of a [`CanvasSurface`](crate::CanvasSurface).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Canvas width in logical pixels.
    pub width: f64,
    /// Canvas height in logical pixels.
    pub height: f64,
    /// Side of the square drawn for each transform handle.
    pub handle_size: f64,
    /// Handle hit radius for mouse input.
    pub handle_hit_tolerance: f64,
    /// Handle hit radius for touch input.
    pub touch_hit_tolerance: f64,
    /// Maximum press/release travel that still counts as a click.
    pub click_tolerance: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 500.0,
            handle_size: HANDLE_SIZE,
            handle_hit_tolerance: HANDLE_HIT_TOLERANCE,
            touch_hit_tolerance: 16.0,
            click_tolerance: 3.0,
        }
    }
}

impl SurfaceConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size())
    }

    /// Clamp a host coordinate into the canvas.
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(point.x.clamp(0.0, self.width), point.y.clamp(0.0, self.height))
    }
}
