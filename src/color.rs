use eframe::egui::Color32;
use egui_plot::MarkerShape;
use palette::{Hsl, IntoColor, Lighten, Srgb};

use crate::data::model::BowlingType;

// ---------------------------------------------------------------------------
// Elite / non-elite colours
// ---------------------------------------------------------------------------

/// Elite performers (t ≥ 2.0).
pub const ELITE: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);
/// Everyone else.
pub const OTHER: Color32 = Color32::from_rgb(0x52, 0x52, 0x52);

pub fn elite_color(elite: bool) -> Color32 {
    if elite { ELITE } else { OTHER }
}

/// A lighter variant of `color` for text drawn on dark table stripes.
pub fn lighten(color: Color32, amount: f32) -> Color32 {
    let rgb = Srgb::new(
        color.r() as f32 / 255.0,
        color.g() as f32 / 255.0,
        color.b() as f32 / 255.0,
    );
    let hsl: Hsl = rgb.into_color();
    let rgb: Srgb = hsl.lighten(amount).into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Marker shapes: bowling type → plot marker
// ---------------------------------------------------------------------------

pub fn marker_for(bowling_type: BowlingType) -> MarkerShape {
    match bowling_type {
        BowlingType::Pace => MarkerShape::Circle,
        BowlingType::Spin => MarkerShape::Diamond,
    }
}

/// Text glyph used in the legend for each marker.
pub fn marker_glyph(bowling_type: BowlingType) -> &'static str {
    match bowling_type {
        BowlingType::Pace => "●",
        BowlingType::Spin => "◆",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lighten_brightens_without_changing_hue_order() {
        let light = lighten(ELITE, 0.3);
        assert!(light.r() >= ELITE.r());
        assert!(light.g() >= ELITE.g());
        assert!(light.b() >= ELITE.b());
        assert!(light.b() >= light.r());
    }

    #[test]
    fn bowling_types_have_distinct_markers() {
        assert_ne!(marker_for(BowlingType::Pace), marker_for(BowlingType::Spin));
    }
}
