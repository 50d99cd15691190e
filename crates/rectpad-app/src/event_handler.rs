//! Routes decoded window input to the canvas surface.

use kurbo::Point;
use rectpad_core::{CanvasSurface, CursorKind, InputState, MouseButton, PointerEvent, SurfaceEvent};
use winit::dpi::PhysicalPosition;
use winit::event::TouchPhase;

/// Map a winit mouse button. Other buttons are not tracked.
pub fn map_mouse_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

pub fn cursor_icon(kind: CursorKind) -> egui::CursorIcon {
    match kind {
        CursorKind::Default => egui::CursorIcon::Default,
        CursorKind::Crosshair => egui::CursorIcon::Crosshair,
        CursorKind::Move => egui::CursorIcon::Move,
        CursorKind::Pointer => egui::CursorIcon::PointingHand,
        CursorKind::ResizeNwSe => egui::CursorIcon::ResizeNwSe,
        CursorKind::ResizeNeSw => egui::CursorIcon::ResizeNeSw,
        CursorKind::ResizeNs => egui::CursorIcon::ResizeVertical,
        CursorKind::ResizeEw => egui::CursorIcon::ResizeHorizontal,
    }
}

/// Feeds mouse and touch input into [`InputState`] and the [`CanvasSurface`].
///
/// Mouse presses and the first finger of a touch both drive the primary
/// pointer; presses outside the canvas never start a gesture.
#[derive(Debug, Clone)]
pub struct EventHandler {
    /// Canvas top-left inside the window, in logical pixels.
    canvas_origin: Point,
}

impl EventHandler {
    pub fn new(canvas_origin: Point) -> Self {
        Self { canvas_origin }
    }

    /// Window position to canvas coordinates.
    pub fn to_canvas(&self, position: PhysicalPosition<f64>, scale_factor: f64) -> Point {
        let logical = position.to_logical::<f64>(scale_factor);
        Point::new(logical.x, logical.y) - self.canvas_origin.to_vec2()
    }

    pub fn pointer_moved(
        &self,
        canvas: &mut CanvasSurface,
        input: &mut InputState,
        point: Point,
    ) -> Vec<SurfaceEvent> {
        let event = PointerEvent::Move { position: point };
        input.handle_pointer_event(&event);
        canvas.handle_pointer_event(&event)
    }

    /// Mouse press/release at the last known pointer position.
    pub fn mouse_button(
        &self,
        canvas: &mut CanvasSurface,
        input: &mut InputState,
        button: MouseButton,
        pressed: bool,
    ) -> Vec<SurfaceEvent> {
        if pressed {
            canvas.set_touch_input(false);
        }
        self.button(canvas, input, button, pressed)
    }

    fn button(
        &self,
        canvas: &mut CanvasSurface,
        input: &mut InputState,
        button: MouseButton,
        pressed: bool,
    ) -> Vec<SurfaceEvent> {
        let position = input.pointer_position;
        let event = if pressed {
            if !canvas.config().bounds().contains(position) {
                return Vec::new();
            }
            PointerEvent::Down { position, button }
        } else {
            // Releases of presses that never reached the canvas
            if !input.is_button_pressed(button) {
                return Vec::new();
            }
            PointerEvent::Up { position, button }
        };
        input.handle_pointer_event(&event);
        canvas.handle_pointer_event(&event)
    }

    pub fn touch(
        &self,
        canvas: &mut CanvasSurface,
        input: &mut InputState,
        finger: u64,
        phase: TouchPhase,
        point: Point,
    ) -> Vec<SurfaceEvent> {
        match phase {
            TouchPhase::Started => {
                if !canvas.config().bounds().contains(point) || !input.claim_touch(finger) {
                    return Vec::new();
                }
                canvas.set_touch_input(true);
                input.pointer_position = point;
                self.button(canvas, input, MouseButton::Left, true)
            }
            TouchPhase::Moved if input.is_active_touch(finger) => {
                self.pointer_moved(canvas, input, point)
            }
            TouchPhase::Ended if input.release_touch(finger) => {
                input.pointer_position = point;
                self.button(canvas, input, MouseButton::Left, false)
            }
            TouchPhase::Cancelled if input.release_touch(finger) => self.focus_lost(canvas, input),
            _ => Vec::new(),
        }
    }

    /// Drop any gesture in progress.
    pub fn focus_lost(&self, canvas: &mut CanvasSurface, input: &mut InputState) -> Vec<SurfaceEvent> {
        input.reset();
        canvas.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rectpad_core::StrokeColor;

    const RED: StrokeColor = StrokeColor::rgb(239, 68, 68);

    fn setup() -> (EventHandler, CanvasSurface, InputState) {
        let mut canvas = CanvasSurface::new();
        canvas.set_color(Some(RED));
        (EventHandler::new(Point::new(0.0, 48.0)), canvas, InputState::new())
    }

    #[test]
    fn test_to_canvas_applies_scale_and_origin() {
        let handler = EventHandler::new(Point::new(0.0, 48.0));
        let point = handler.to_canvas(PhysicalPosition::new(200.0, 296.0), 2.0);
        assert_eq!(point, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_mouse_draws_rectangle() {
        let (handler, mut canvas, mut input) = setup();
        handler.pointer_moved(&mut canvas, &mut input, Point::new(100.0, 100.0));
        let events = handler.mouse_button(&mut canvas, &mut input, MouseButton::Left, true);
        assert_eq!(events, vec![SurfaceEvent::ClearColor]);
        handler.pointer_moved(&mut canvas, &mut input, Point::new(150.0, 140.0));
        handler.mouse_button(&mut canvas, &mut input, MouseButton::Left, false);

        assert_eq!(canvas.store().len(), 1);
        assert!(!input.is_button_pressed(MouseButton::Left));
    }

    #[test]
    fn test_press_outside_canvas_ignored() {
        let (handler, mut canvas, mut input) = setup();
        handler.pointer_moved(&mut canvas, &mut input, Point::new(100.0, -20.0));
        let events = handler.mouse_button(&mut canvas, &mut input, MouseButton::Left, true);
        assert!(events.is_empty());
        assert!(!input.is_button_pressed(MouseButton::Left));
        assert!(canvas.store().is_empty());
    }

    #[test]
    fn test_second_finger_ignored() {
        let (handler, mut canvas, mut input) = setup();
        handler.touch(&mut canvas, &mut input, 1, TouchPhase::Started, Point::new(100.0, 100.0));
        assert!(canvas.is_drawing());

        let events = handler.touch(&mut canvas, &mut input, 2, TouchPhase::Started, Point::new(300.0, 300.0));
        assert!(events.is_empty());
        handler.touch(&mut canvas, &mut input, 2, TouchPhase::Moved, Point::new(400.0, 400.0));
        handler.touch(&mut canvas, &mut input, 1, TouchPhase::Moved, Point::new(150.0, 140.0));
        handler.touch(&mut canvas, &mut input, 1, TouchPhase::Ended, Point::new(150.0, 140.0));

        let rect = canvas.store().iter().next().unwrap();
        assert_eq!(rect.width, 50.0);
        assert_eq!(rect.height, 40.0);
    }

    #[test]
    fn test_touch_cancel_ends_gesture() {
        let (handler, mut canvas, mut input) = setup();
        handler.touch(&mut canvas, &mut input, 1, TouchPhase::Started, Point::new(100.0, 100.0));
        handler.touch(&mut canvas, &mut input, 1, TouchPhase::Moved, Point::new(102.0, 101.0));
        handler.touch(&mut canvas, &mut input, 1, TouchPhase::Cancelled, Point::new(102.0, 101.0));

        assert!(!canvas.is_drawing());
        assert!(canvas.store().is_empty());
        assert!(!input.is_dragging);
    }

    #[test]
    fn test_release_without_press_ignored() {
        let (handler, mut canvas, mut input) = setup();
        handler.pointer_moved(&mut canvas, &mut input, Point::new(100.0, 100.0));
        let events = handler.mouse_button(&mut canvas, &mut input, MouseButton::Left, false);
        assert!(events.is_empty());
        assert!(canvas.store().is_empty());
    }

    #[test]
    fn test_touch_on_background_deselects() {
        let (handler, mut canvas, mut input) = setup();
        handler.touch(&mut canvas, &mut input, 1, TouchPhase::Started, Point::new(100.0, 100.0));
        handler.touch(&mut canvas, &mut input, 1, TouchPhase::Moved, Point::new(150.0, 140.0));
        handler.touch(&mut canvas, &mut input, 1, TouchPhase::Ended, Point::new(150.0, 140.0));
        assert!(canvas.selected().is_some());

        let events = handler.touch(&mut canvas, &mut input, 2, TouchPhase::Started, Point::new(600.0, 400.0));
        assert_eq!(events, vec![SurfaceEvent::ClearColor]);
        assert_eq!(canvas.selected(), None);

        handler.touch(&mut canvas, &mut input, 2, TouchPhase::Ended, Point::new(600.0, 400.0));
        assert_eq!(canvas.selected(), None);
        assert_eq!(canvas.store().len(), 1);
    }

    #[test]
    fn test_cursor_icons() {
        assert_eq!(cursor_icon(CursorKind::ResizeNs), egui::CursorIcon::ResizeVertical);
        assert_eq!(cursor_icon(CursorKind::Pointer), egui::CursorIcon::PointingHand);
    }
}
