//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer};
use kurbo::{Affine, Rect, Shape as KurboShape, Stroke};
use peniko::{Color, Fill};
use rectpad_core::selection::Handle;
use rectpad_core::shapes::Rectangle;
use vello::Scene;

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Selection highlight color.
    selection_color: Color,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
        }
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn render_canvas(&mut self, bounds: Rect, fill: Color, transform: Affine) {
        let path = bounds.to_path(0.1);
        self.scene.fill(Fill::NonZero, transform, fill, None, &path);
        self.scene.stroke(
            &Stroke::new(1.0),
            transform,
            Color::from_rgba8(203, 213, 225, 255),
            None,
            &path,
        );
    }

    fn render_rectangle(&mut self, bounds: Rect, color: Color, transform: Affine) {
        self.scene.stroke(
            &Stroke::new(Rectangle::STROKE_WIDTH),
            transform,
            color,
            None,
            &bounds.to_path(0.1),
        );
    }

    /// Dashed outline around the selected rectangle.
    fn render_selection_bounds(&mut self, bounds: Rect, transform: Affine) {
        let stroke = Stroke::new(1.0).with_dashes(0.0, &[4.0, 4.0]);
        self.scene.stroke(
            &stroke,
            transform,
            self.selection_color,
            None,
            &bounds.inflate(3.0, 3.0).to_path(0.1),
        );
    }

    /// Square handle: white fill, selection-colored border.
    fn render_handle(&mut self, handle: &Handle, transform: Affine, size: f64) {
        let path = handle.rect(size).to_path(0.1);
        self.scene.fill(Fill::NonZero, transform, Color::WHITE, None, &path);
        self.scene.stroke(
            &Stroke::new(1.5),
            transform,
            self.selection_color,
            None,
            &path,
        );
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        // Clear the scene
        self.scene.reset();
        self.selection_color = ctx.selection_color;

        let surface = ctx.surface;
        let transform = ctx.transform();

        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            ctx.background_color,
            None,
            &ctx.viewport(),
        );
        self.render_canvas(surface.config().bounds(), ctx.canvas_color, transform);

        // Oldest first, so newer rectangles paint on top
        for rect in surface.store().ordered() {
            let color = rect.stroke.map_or(ctx.colorless_color, Color::from);
            self.render_rectangle(surface.display_rect(rect), color, transform);
        }

        let handles = surface.handles();
        if let Some(bounds) = surface.selected_bounds() {
            if !handles.is_empty() {
                self.render_selection_bounds(bounds, transform);
            }
        }
        let size = surface.config().handle_size;
        for handle in &handles {
            self.render_handle(handle, transform, size);
        }
    }
}
