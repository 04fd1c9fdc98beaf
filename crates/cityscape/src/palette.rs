//! Scene colours and the shading helpers used to fake lighting on flat faces.

use bevy::color::Srgba;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tier::Tier;

// ---------------------------------------------------------------------------
// Shading helpers
// ---------------------------------------------------------------------------

/// Scale RGB up by `factor`, saturating at 1.
pub fn lighten(c: Color, factor: f32) -> Color {
    let s = c.to_srgba();
    Color::srgba(
        (s.red * factor).min(1.0),
        (s.green * factor).min(1.0),
        (s.blue * factor).min(1.0),
        s.alpha,
    )
}

/// Scale RGB down by `factor`.
pub fn darken(c: Color, factor: f32) -> Color {
    let s = c.to_srgba();
    Color::srgba(s.red * factor, s.green * factor, s.blue * factor, s.alpha)
}

/// `#rrggbb` for SVG attributes. Alpha is emitted separately as opacity.
pub fn svg_hex(c: Color) -> String {
    let Srgba {
        red, green, blue, ..
    } = c.to_srgba();
    let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}", byte(red), byte(green), byte(blue))
}

/// Alpha channel of a colour, for `fill-opacity`.
pub fn alpha(c: Color) -> f32 {
    c.to_srgba().alpha
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub sky: Color,
    pub star: Color,
    pub moon: Color,
    pub ground: Color,
    pub road: Color,
    pub road_marking: Color,
    pub lamp_post: Color,
    pub lamp_head: Color,
    pub lamp_glow: Color,
    pub sign_plate: Color,
    pub sign_post: Color,
    pub label_text: Color,
    pub caption_text: Color,
    pub value_text: Color,
    pub window_lit: Color,
    pub window_dark: Color,
    /// Base wall colour of XSmall, Small, Medium and Large buildings.
    pub tier_walls: [Color; 4],
    /// Cycled across vehicle props.
    pub vehicles: Vec<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky: Color::srgb_u8(0x0d, 0x11, 0x17),
            star: Color::WHITE,
            moon: Color::srgb_u8(0xf5, 0xf3, 0xce),
            ground: Color::srgb_u8(0x1b, 0x23, 0x30),
            road: Color::srgb_u8(0x2d, 0x33, 0x3b),
            road_marking: Color::srgb_u8(0xd4, 0xb8, 0x4a),
            lamp_post: Color::srgb_u8(0x3b, 0x42, 0x52),
            lamp_head: Color::srgb_u8(0xff, 0xd8, 0x66),
            lamp_glow: Color::srgba(1.0, 0.85, 0.4, 0.25),
            sign_plate: Color::srgb_u8(0x23, 0x86, 0x36),
            sign_post: Color::srgb_u8(0x48, 0x4f, 0x58),
            label_text: Color::WHITE,
            caption_text: Color::srgb_u8(0x9c, 0xa3, 0xaf),
            value_text: Color::WHITE,
            window_lit: Color::srgb_u8(0xff, 0xd8, 0x66),
            window_dark: Color::srgb_u8(0x1f, 0x29, 0x37),
            tier_walls: [
                Color::srgb_u8(0x9b, 0xe9, 0xa8),
                Color::srgb_u8(0x40, 0xc4, 0x63),
                Color::srgb_u8(0x30, 0xa1, 0x4e),
                Color::srgb_u8(0x21, 0x6e, 0x39),
            ],
            vehicles: vec![
                Color::srgb_u8(0xe5, 0x53, 0x4b),
                Color::srgb_u8(0x53, 0x9b, 0xf5),
            ],
        }
    }
}

impl Palette {
    /// Wall colour for a building tier. Empty lots have no walls and fall back
    /// to the smallest tier's colour.
    pub fn wall(&self, tier: Tier) -> Color {
        self.tier_walls[tier.index().saturating_sub(1).min(3)]
    }

    pub fn vehicle(&self, index: usize) -> Color {
        if self.vehicles.is_empty() {
            return self.road_marking;
        }
        self.vehicles[index % self.vehicles.len()]
    }
}
