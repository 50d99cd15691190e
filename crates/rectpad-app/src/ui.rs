//! UI components using egui.

use egui::{Color32, Context};
use rectpad_core::StrokeColor;
use rectpad_widgets::{ColorPalette, palette_name, section_label, toolbar_frame, vertical_separator};

/// Height of the palette bar above the canvas, in logical pixels.
pub const TOOLBAR_HEIGHT: f32 = 48.0;

/// UI state owned by the host.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Color chosen in the palette, `None` when cleared.
    pub color: Option<Color32>,
}

impl UiState {
    pub fn new(color: Option<Color32>) -> Self {
        Self { color }
    }
}

/// Actions triggered by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// The user picked a color (or "no color").
    SetColor(Option<Color32>),
}

/// Render the palette bar and return any triggered action.
pub fn render_ui(ctx: &Context, ui_state: &UiState, in_use: &[Color32]) -> Option<UiAction> {
    let mut action = None;

    egui::TopBottomPanel::top("palette")
        .exact_height(TOOLBAR_HEIGHT)
        .frame(toolbar_frame())
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                section_label(ui, "Color");
                vertical_separator(ui);

                if let Some(color) = ColorPalette::new(ui_state.color).in_use(in_use).show(ui) {
                    action = Some(UiAction::SetColor(color));
                }

                vertical_separator(ui);
                let name = match ui_state.color {
                    Some(color) => palette_name(color).unwrap_or("Custom"),
                    None => "None",
                };
                section_label(ui, name);
            });
        });

    action
}

/// Palette color to rectangle stroke.
pub fn stroke_color(color: Color32) -> StrokeColor {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    StrokeColor::new(r, g, b, a)
}

/// Rectangle stroke to palette color.
pub fn color32(color: StrokeColor) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_color_matches_stroke() {
        let blue = Color32::from_rgb(59, 130, 246);
        let stroke = stroke_color(blue);
        assert_eq!(stroke, StrokeColor::rgb(59, 130, 246));
        assert_eq!(color32(stroke), blue);
    }
}
