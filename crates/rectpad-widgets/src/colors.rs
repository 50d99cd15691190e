//! Stroke palette and color picker components.
//!
//! Each palette entry can be bound to at most one rectangle, so the palette
//! is a short list of clearly distinct Tailwind 500-level colors.

use egui::{Color32, CursorIcon, Pos2, Rect, Sense, Stroke, Ui, Vec2, vec2};

use crate::{sizing, theme};

/// A named palette entry.
#[derive(Debug, Clone, Copy)]
pub struct PaletteColor {
    /// Display name (e.g., "Red", "Blue")
    pub name: &'static str,
    pub color: Color32,
}

impl PaletteColor {
    pub const fn new(name: &'static str, r: u8, g: u8, b: u8) -> Self {
        Self {
            name,
            color: Color32::from_rgb(r, g, b),
        }
    }
}

// Tailwind CSS 500 shades - https://tailwindcss.com/docs/colors
pub const PALETTE: &[PaletteColor] = &[
    PaletteColor::new("Red", 239, 68, 68),
    PaletteColor::new("Orange", 249, 115, 22),
    PaletteColor::new("Amber", 245, 158, 11),
    PaletteColor::new("Lime", 132, 204, 22),
    PaletteColor::new("Emerald", 16, 185, 129),
    PaletteColor::new("Cyan", 6, 182, 212),
    PaletteColor::new("Blue", 59, 130, 246),
    PaletteColor::new("Violet", 139, 92, 246),
    PaletteColor::new("Pink", 236, 72, 153),
    PaletteColor::new("Slate", 100, 116, 139),
];

/// Name of a palette color, if `color` is one.
pub fn palette_name(color: Color32) -> Option<&'static str> {
    PALETTE
        .iter()
        .find(|entry| colors_match(entry.color, color))
        .map(|entry| entry.name)
}

/// Exact color equality (alpha included).
pub fn colors_match(a: Color32, b: Color32) -> bool {
    a.to_srgba_unmultiplied() == b.to_srgba_unmultiplied()
}

/// A clickable circular color swatch.
pub struct ColorSwatch<'a> {
    color: Color32,
    tooltip: &'a str,
    selected: bool,
    /// Marks a color already bound to a rectangle.
    in_use: bool,
    size: Vec2,
}

impl<'a> ColorSwatch<'a> {
    /// Create a new color swatch.
    pub fn new(color: Color32, tooltip: &'a str) -> Self {
        Self {
            color,
            tooltip,
            selected: false,
            in_use: false,
            size: vec2(sizing::SWATCH, sizing::SWATCH),
        }
    }

    /// Set whether this swatch is selected.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Set whether this color already has a rectangle.
    pub fn in_use(mut self, in_use: bool) -> Self {
        self.in_use = in_use;
        self
    }

    /// Show the swatch and return (clicked, rect).
    pub fn show(self, ui: &mut Ui) -> (bool, Rect) {
        let (rect, response) = ui.allocate_exact_size(self.size, Sense::click());

        if ui.is_rect_visible(rect) {
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0;

            ui.painter().circle_filled(center, radius, self.color);

            if self.selected {
                // Inner offset ring
                ui.painter()
                    .circle_stroke(center, radius - 3.0, Stroke::new(2.0, theme::RING));
            }
            if self.in_use {
                ui.painter().circle_filled(
                    Pos2::new(rect.right() - 3.0, rect.bottom() - 3.0),
                    3.0,
                    theme::TEXT,
                );
            }
        }

        let clicked = response.clicked();
        response.on_hover_text(self.tooltip).on_hover_cursor(CursorIcon::PointingHand);
        (clicked, rect)
    }
}

/// A "no color" swatch (white with red diagonal).
pub struct NoColorSwatch<'a> {
    tooltip: &'a str,
    selected: bool,
    size: Vec2,
}

impl<'a> NoColorSwatch<'a> {
    /// Create a new "no color" swatch.
    pub fn new(tooltip: &'a str) -> Self {
        Self {
            tooltip,
            selected: false,
            size: vec2(sizing::SWATCH, sizing::SWATCH),
        }
    }

    /// Set whether this swatch is selected.
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Show the swatch and return true if clicked.
    pub fn show(self, ui: &mut Ui) -> bool {
        let (rect, response) = ui.allocate_exact_size(self.size, Sense::click());

        if ui.is_rect_visible(rect) {
            let center = rect.center();
            let radius = rect.width().min(rect.height()) / 2.0;

            ui.painter().circle_filled(center, radius, Color32::WHITE);
            ui.painter()
                .circle_stroke(center, radius, Stroke::new(1.0, Color32::from_gray(200)));

            // Red diagonal line
            let offset = radius * 0.6;
            ui.painter().line_segment(
                [
                    Pos2::new(center.x - offset, center.y + offset),
                    Pos2::new(center.x + offset, center.y - offset),
                ],
                Stroke::new(2.0, Color32::from_rgb(239, 68, 68)),
            );

            if self.selected {
                ui.painter()
                    .circle_stroke(center, radius - 3.0, Stroke::new(2.0, theme::RING));
            }
        }

        let clicked = response.clicked();
        response.on_hover_text(self.tooltip).on_hover_cursor(CursorIcon::PointingHand);
        clicked
    }
}

/// A row of palette swatches preceded by a "no color" swatch.
pub struct ColorPalette<'a> {
    current: Option<Color32>,
    in_use: &'a [Color32],
}

impl<'a> ColorPalette<'a> {
    pub fn new(current: Option<Color32>) -> Self {
        Self { current, in_use: &[] }
    }

    /// Colors that already have a rectangle.
    pub fn in_use(mut self, colors: &'a [Color32]) -> Self {
        self.in_use = colors;
        self
    }

    /// Show the palette. Returns the new color when the user picked one;
    /// `Some(None)` means "no color".
    pub fn show(self, ui: &mut Ui) -> Option<Option<Color32>> {
        let mut picked = None;

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing = vec2(6.0, 0.0);

            if NoColorSwatch::new("No color")
                .selected(self.current.is_none())
                .show(ui)
            {
                picked = Some(None);
            }

            for entry in PALETTE {
                let selected = self.current.is_some_and(|c| colors_match(c, entry.color));
                let in_use = self.in_use.iter().any(|&c| colors_match(c, entry.color));
                let (clicked, _) = ColorSwatch::new(entry.color, entry.name)
                    .selected(selected)
                    .in_use(in_use)
                    .show(ui);
                if clicked {
                    picked = Some(Some(entry.color));
                }
            }
        });

        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_match_is_exact() {
        let red = Color32::from_rgb(239, 68, 68);
        assert!(colors_match(red, Color32::from_rgb(239, 68, 68)));
        assert!(!colors_match(red, Color32::from_rgb(239, 68, 69)));
        assert!(!colors_match(red, Color32::from_rgba_unmultiplied(239, 68, 68, 128)));
    }

    #[test]
    fn test_palette_entries_are_distinct() {
        for (i, a) in PALETTE.iter().enumerate() {
            for b in &PALETTE[i + 1..] {
                assert!(!colors_match(a.color, b.color), "{} == {}", a.name, b.name);
            }
        }
    }

    #[test]
    fn test_palette_name() {
        assert_eq!(palette_name(Color32::from_rgb(59, 130, 246)), Some("Blue"));
        assert_eq!(palette_name(Color32::BLACK), None);
    }
}
