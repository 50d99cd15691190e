//! Shape definitions for the canvas.

mod rectangle;

pub use rectangle::Rectangle;

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a rectangle in the store.
///
/// Identifiers come from a monotonically increasing counter owned by the
/// store and display as plain decimal strings ("1", "2", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RectId(u64);

impl RectId {
    /// Wrap a raw counter value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stroke color of a rectangle (RGBA8).
///
/// Doubles as the rectangle's tag: two colors are the same tag only when
/// every channel matches exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrokeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl StrokeColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

impl From<StrokeColor> for Color {
    fn from(color: StrokeColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_id_display() {
        let id = RectId::new(42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_peniko_conversion() {
        let stroke = StrokeColor::rgb(34, 197, 94);
        let rgba = Color::from(stroke).to_rgba8();
        assert_eq!((rgba.r, rgba.g, rgba.b, rgba.a), (34, 197, 94, 255));
    }
}
