//! Color mapping from card colors to egui colors.
//!
//! Node fills and link strokes carry an opacity while they fade in or out;
//! these helpers fold it into the alpha channel.

use egui::Color32;
use treecard::color::Rgb;
use treecard::{with_alpha, CardPalette};

/// Converts a card color at the given opacity (0.0 to 1.0).
pub fn fade(color: Rgb, opacity: f32) -> Color32 {
    with_alpha(color.into(), alpha(opacity))
}

/// Link stroke color: the palette's link opacity times the element's own.
pub fn link_color(palette: &CardPalette, opacity: f32) -> Color32 {
    fade(palette.link, palette.link_opacity * opacity)
}

fn alpha(opacity: f32) -> u8 {
    (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
}
