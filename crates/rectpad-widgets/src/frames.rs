//! Panel frames.

use egui::{Frame, Margin, Stroke};

use crate::theme;

/// Frame for the palette bar above the canvas.
pub fn toolbar_frame() -> Frame {
    Frame::new()
        .fill(theme::PANEL_BG)
        .stroke(Stroke::new(1.0, theme::BORDER))
        .inner_margin(Margin::symmetric(12, 6))
}
