//! Reusable egui widget components for the Rectpad color picker.
//!
//! - **Colors**: the stroke palette, color swatches, the palette bar
//! - **Frames**: the palette bar frame
//! - **Layout**: section labels, separators

pub mod colors;
pub mod frames;
pub mod layout;

pub use colors::{
    ColorPalette, ColorSwatch, NoColorSwatch, PALETTE, PaletteColor, colors_match, palette_name,
};
pub use frames::toolbar_frame;
pub use layout::{section_label, vertical_separator};

/// Standard sizing constants used across widgets.
pub mod sizing {
    /// Palette swatch size
    pub const SWATCH: f32 = 24.0;
}

/// Standard colors used across widgets.
pub mod theme {
    use egui::Color32;

    /// Text color (dark gray)
    pub const TEXT: Color32 = Color32::from_rgb(60, 60, 60);
    /// Muted text color
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 120, 120);
    /// Border color
    pub const BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Ring drawn around the active swatch
    pub const RING: Color32 = Color32::from_gray(30);
    /// Panel background
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(250, 250, 252, 250);
}
