//! Input state management for mouse/touch events.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers. Touch contacts report as `Left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
}

/// Tracks pressed buttons, the pointer position and the driving touch.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Current pointer position in canvas coordinates.
    pub pointer_position: Point,
    /// Currently pressed mouse buttons.
    pressed_buttons: HashSet<MouseButton>,
    /// Whether the primary button is held.
    pub is_dragging: bool,
    /// Finger driving the pointer while a touch is in progress.
    active_touch: Option<u64>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            pointer_position: Point::ZERO,
            pressed_buttons: HashSet::new(),
            is_dragging: false,
            active_touch: None,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.insert(button);
                if button == MouseButton::Left {
                    self.is_dragging = true;
                }
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.remove(&button);
                if button == MouseButton::Left {
                    self.is_dragging = false;
                }
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
            }
        }
    }

    /// Let a finger drive the pointer. Only the first finger down wins.
    pub fn claim_touch(&mut self, finger: u64) -> bool {
        match self.active_touch {
            None => {
                self.active_touch = Some(finger);
                true
            }
            Some(active) => active == finger,
        }
    }

    /// Whether `finger` is the one driving the pointer.
    pub fn is_active_touch(&self, finger: u64) -> bool {
        self.active_touch == Some(finger)
    }

    /// Release the driving finger. Returns false for any other finger.
    pub fn release_touch(&mut self, finger: u64) -> bool {
        if self.active_touch == Some(finger) {
            self.active_touch = None;
            true
        } else {
            false
        }
    }

    /// Forget every pressed button and touch (e.g. on focus loss).
    pub fn reset(&mut self) {
        let position = self.pointer_position;
        *self = Self::default();
        self.pointer_position = position;
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_button_press() {
        let mut input = InputState::new();
        input.handle_pointer_event(&down(100.0, 100.0));

        assert!(input.is_button_pressed(MouseButton::Left));
        assert!(!input.is_button_pressed(MouseButton::Right));
        assert!(input.is_dragging);
    }

    #[test]
    fn test_button_release() {
        let mut input = InputState::new();
        input.handle_pointer_event(&down(100.0, 100.0));
        input.handle_pointer_event(&up(100.0, 100.0));

        assert!(!input.is_button_pressed(MouseButton::Left));
        assert!(!input.is_dragging);
        assert_eq!(input.pointer_position, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_move_tracks_position() {
        let mut input = InputState::new();
        input.handle_pointer_event(&down(100.0, 100.0));
        input.handle_pointer_event(&PointerEvent::Move {
            position: Point::new(150.0, 120.0),
        });

        assert!(input.is_dragging);
        assert_eq!(input.pointer_position, Point::new(150.0, 120.0));
    }

    #[test]
    fn test_first_finger_wins() {
        let mut input = InputState::new();
        assert!(input.claim_touch(7));
        assert!(!input.claim_touch(8));
        assert!(input.claim_touch(7));
        assert!(!input.release_touch(8));
        assert!(input.release_touch(7));
        assert!(input.claim_touch(8));
    }

    #[test]
    fn test_reset_keeps_position() {
        let mut input = InputState::new();
        input.handle_pointer_event(&down(40.0, 30.0));
        input.claim_touch(1);
        input.reset();

        assert!(!input.is_button_pressed(MouseButton::Left));
        assert!(!input.is_dragging);
        assert!(!input.is_active_touch(1));
        assert_eq!(input.pointer_position, Point::new(40.0, 30.0));
    }
}
