//! Renderer trait abstraction.

use kurbo::{Affine, Point, Rect, Size};
use peniko::Color;
use rectpad_core::CanvasSurface;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The surface to render.
    pub surface: &'a CanvasSurface,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Top-left of the canvas inside the window, in logical pixels.
    pub canvas_origin: Point,
    /// Window background color.
    pub background_color: Color,
    /// Fill of the drawing area.
    pub canvas_color: Color,
    /// Selection highlight color.
    pub selection_color: Color,
    /// Stroke used for a rectangle drawn without a color.
    pub colorless_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(surface: &'a CanvasSurface, viewport_size: Size) -> Self {
        Self {
            surface,
            viewport_size,
            scale_factor: 1.0,
            canvas_origin: Point::ZERO,
            background_color: Color::from_rgba8(241, 245, 249, 255),
            canvas_color: Color::WHITE,
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            colorless_color: Color::from_rgba8(156, 163, 175, 255), // Gray
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Place the canvas inside the window.
    pub fn with_canvas_origin(mut self, origin: Point) -> Self {
        self.canvas_origin = origin;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the selection highlight color.
    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    /// Canvas to physical pixel transform.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale_factor) * Affine::translate(self.canvas_origin.to_vec2())
    }

    /// Whole viewport in physical pixels.
    pub fn viewport(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.viewport_size)
    }
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other rendering engines.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_applies_origin_then_scale() {
        let surface = CanvasSurface::new();
        let ctx = RenderContext::new(&surface, Size::new(2000.0, 1100.0))
            .with_scale_factor(2.0)
            .with_canvas_origin(Point::new(0.0, 50.0));
        let mapped = ctx.transform() * Point::new(10.0, 10.0);
        assert_eq!(mapped, Point::new(20.0, 120.0));
    }
}
